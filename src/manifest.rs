//! Submodule build descriptors and tree-wide dependency aggregation.
//!
//! Every submodule directory carries a static descriptor (`setup.yaml` by
//! default) listing what it needs at install time:
//!
//! ```yaml
//! name: tabular
//! install_requires:
//!   - numpy                              # range from the shared table
//!   - "xgboost>=2.0,<2.2"                # explicit specifier
//!   - "autogluon.core=={{ version }}"    # pinned to the version being built
//! ```
//!
//! Aggregation walks the checkout, reads every descriptor below the root and
//! unions the validated entries. A descriptor that cannot be read contributes
//! nothing; it never stops the scan.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::deps::{filter_valid, DependencySet, DependencyTable};
use crate::ui;

/// Parsed contents of a build descriptor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Descriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub install_requires: Option<Vec<String>>,
}

impl Descriptor {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read descriptor {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse descriptor {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Collects dependencies from descriptors using one table and version.
#[derive(Debug, Clone)]
pub struct Aggregator<'a> {
    table: &'a DependencyTable,
    descriptor_name: String,
    version: Option<String>,
}

impl<'a> Aggregator<'a> {
    pub fn new(table: &'a DependencyTable, descriptor_name: impl Into<String>) -> Self {
        Self {
            table,
            descriptor_name: descriptor_name.into(),
            version: None,
        }
    }

    /// Bind the version substituted for `{{ version }}` in descriptor entries.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn descriptor_name(&self) -> &str {
        &self.descriptor_name
    }

    /// Dependencies declared by one descriptor. Failures are reported as a
    /// warning and yield an empty list.
    pub fn extract_dependencies(&self, descriptor_path: &Path) -> Vec<String> {
        match self.try_extract(descriptor_path) {
            Ok(deps) => deps,
            Err(e) => {
                ui::warn(&format!(
                    "Skipping {}: {:#}",
                    descriptor_path.display(),
                    e
                ));
                Vec::new()
            }
        }
    }

    /// Like [`Aggregator::extract_dependencies`] but surfaces the failure.
    pub fn try_extract(&self, descriptor_path: &Path) -> Result<Vec<String>> {
        let descriptor = Descriptor::load(descriptor_path)?;
        let Some(entries) = descriptor.install_requires else {
            return Ok(Vec::new());
        };

        let rendered = entries
            .iter()
            .map(|entry| self.render_entry(entry))
            .collect::<Result<Vec<_>>>()
            .with_context(|| {
                format!(
                    "Failed to render install_requires in {}",
                    descriptor_path.display()
                )
            })?;

        let resolved = self.table.dependency_version_ranges(&rendered);
        Ok(filter_valid(
            resolved,
            &descriptor_path.display().to_string(),
        ))
    }

    fn render_entry(&self, entry: &str) -> Result<String> {
        if !entry.contains('{') {
            return Ok(entry.trim().to_string());
        }

        let mut context = tera::Context::new();
        context.insert("version", self.version.as_deref().unwrap_or(""));
        let rendered = tera::Tera::one_off(entry, &context, false)
            .with_context(|| format!("Bad template in entry '{}'", entry))?;
        Ok(rendered.trim().to_string())
    }

    /// Descriptors below `root`, skipping excluded directory names at every
    /// level and the descriptor sitting directly in `root`.
    pub fn find_descriptors(&self, root: &Path, excluded_dir_names: &[String]) -> Vec<PathBuf> {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 || !e.file_type().is_dir() {
                    return true;
                }
                let name = e.file_name().to_string_lossy();
                !excluded_dir_names.iter().any(|ex| ex.as_str() == name)
            });

        let mut found = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    ui::warn(&format!("Skipping unreadable path: {}", e));
                    continue;
                }
            };

            // depth 1 is the top-level descriptor, which is not a submodule
            if entry.depth() > 1
                && entry.file_type().is_file()
                && entry.file_name().to_string_lossy() == self.descriptor_name
            {
                found.push(entry.into_path());
            }
        }

        found
    }

    /// Union of the validated dependencies of every submodule under `root`.
    pub fn gather_all(&self, root: &Path, excluded_dir_names: &[String]) -> Vec<String> {
        let mut set = DependencySet::new();
        for path in self.find_descriptors(root, excluded_dir_names) {
            set.extend(self.extract_dependencies(&path));
        }
        set.into_vec()
    }
}
