//! Setup metadata handed to the packaging command.
//!
//! The packaging step itself is an external program; agbuild prepares the
//! mapping it needs (name, version, packages, dependencies, classifiers, ...)
//! and writes it as JSON.

use anyhow::{Context, Result};
use glob::Pattern;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{resolve_path, BuildEnv, Settings};
use crate::deps::{DependencySet, DependencyTable};
use crate::manifest::Aggregator;
use crate::paths::README_FILE;
use crate::ui;
use crate::version::VersionResolver;

pub const STATUS_STABLE: &str = "Development Status :: 5 - Production/Stable";
pub const STATUS_BETA: &str = "Development Status :: 4 - Beta";

/// Include pattern and source directory used for submodule packages
const SUBMODULE_INCLUDE: &str = "autogluon.*";
const SUBMODULE_SOURCE_DIR: &str = "src";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupMetadata {
    pub name: String,
    pub version: String,
    pub author: String,
    pub url: String,
    pub description: String,
    pub long_description: String,
    pub long_description_content_type: String,
    pub license: String,
    pub license_files: Vec<String>,
    pub packages: Vec<String>,
    pub package_dir: BTreeMap<String, String>,
    pub zip_safe: bool,
    pub include_package_data: bool,
    pub python_requires: String,
    pub package_data: BTreeMap<String, Vec<String>>,
    pub classifiers: Vec<String>,
    pub project_urls: BTreeMap<String, String>,
    pub install_requires: Vec<String>,
}

impl SetupMetadata {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize setup metadata")
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = self.to_json()?;
        fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write setup metadata to {}", path.display()))
    }
}

pub fn development_status(release: bool) -> &'static str {
    if release {
        STATUS_STABLE
    } else {
        STATUS_BETA
    }
}

/// Dotted names of every directory under `where_dir` whose name matches
/// `include`. Directories with a `.` in their name, and `__pycache__`, are
/// not packages and are not descended into.
pub fn find_namespace_packages(where_dir: &Path, include: &str) -> Result<Vec<String>> {
    let pattern = Pattern::new(include)
        .with_context(|| format!("Invalid package include pattern '{}'", include))?;

    if !where_dir.is_dir() {
        anyhow::bail!("Package source directory {} not found", where_dir.display());
    }

    let walker = WalkDir::new(where_dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            e.file_type().is_dir() && !name.contains('.') && name != "__pycache__"
        });

    let mut packages = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to scan {}", where_dir.display()))?;
        if entry.depth() == 0 {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(where_dir)
            .context("Scanned path escaped the source directory")?;
        let package = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(".");

        if pattern.matches(&package) {
            packages.push(package);
        }
    }

    packages.sort();
    Ok(packages)
}

/// Setup metadata for the top-level package (`submodule` is `None`) or one
/// submodule, without dependencies.
pub fn default_setup_args(
    root: &Path,
    settings: &Settings,
    env: &BuildEnv,
    version: &str,
    submodule: Option<&str>,
) -> Result<SetupMetadata> {
    let package = &settings.package;

    let readme = root.join(README_FILE);
    let long_description = fs::read_to_string(&readme)
        .with_context(|| format!("Failed to read long description from {}", readme.display()))?;

    let (source_dir, include, package_root) = match submodule {
        Some(sub) => (
            SUBMODULE_SOURCE_DIR.to_string(),
            SUBMODULE_INCLUDE.to_string(),
            root.join(sub),
        ),
        None => (
            package.source_dir.clone(),
            package.include.clone(),
            root.to_path_buf(),
        ),
    };
    let packages = find_namespace_packages(&resolve_path(&package_root, &source_dir)?, &include)?;

    let mut classifiers = vec![development_status(env.release).to_string()];
    classifiers.extend(package.classifiers.iter().cloned());

    Ok(SetupMetadata {
        name: env.distribution_name(submodule),
        version: version.to_string(),
        author: package.author.clone(),
        url: package.url.clone(),
        description: package.description.clone(),
        long_description,
        long_description_content_type: "text/markdown".to_string(),
        license: package.license.clone(),
        license_files: package.license_files.clone(),
        packages,
        package_dir: BTreeMap::from([(String::new(), source_dir)]),
        zip_safe: package.zip_safe,
        include_package_data: true,
        python_requires: package.python_requires.clone(),
        package_data: BTreeMap::from([("autogluon".to_string(), vec!["LICENSE".to_string()])]),
        classifiers,
        project_urls: package.project_urls.clone(),
        install_requires: Vec::new(),
    })
}

/// How a metadata preparation run treats the version suffix cache.
#[derive(Debug, Clone, Default)]
pub struct PrepareOptions {
    pub submodule: Option<String>,
    /// Skip reading `VERSION.minor`
    pub no_cache: bool,
    /// Save the suffix to `VERSION.minor`
    pub write_cache: bool,
}

/// Install requirements for the top-level package or one submodule.
///
/// The top-level package gets its own descriptor's entries plus everything
/// the submodules declare; a submodule gets only its own descriptor.
pub fn collect_install_requires(
    root: &Path,
    settings: &Settings,
    env: &BuildEnv,
    version: &str,
    submodule: Option<&str>,
) -> Vec<String> {
    let deps = &settings.dependencies;
    let table = DependencyTable::from_settings(deps, env.lite);
    let aggregator = Aggregator::new(&table, deps.descriptor.clone()).with_version(version);

    let own_dir = match submodule {
        Some(sub) => root.join(sub),
        None => root.to_path_buf(),
    };
    let own_descriptor = own_dir.join(&deps.descriptor);

    let mut set = DependencySet::new();
    if own_descriptor.is_file() {
        set.extend(aggregator.extract_dependencies(&own_descriptor));
    } else {
        ui::notice(&format!(
            "No descriptor at {}, nothing declared at this level",
            own_descriptor.display()
        ));
    }

    if submodule.is_none() {
        set.extend(aggregator.gather_all(root, &deps.excluded_dirs));
    }

    set.into_vec()
}

/// Resolve the version, stamp it, aggregate dependencies and assemble the
/// complete setup metadata.
pub fn prepare_metadata(
    root: &Path,
    settings: &Settings,
    env: &BuildEnv,
    options: &PrepareOptions,
) -> Result<SetupMetadata> {
    let submodule = options.submodule.as_deref();

    let resolver = VersionResolver::new(root, env);
    let version = resolver.resolve(!options.no_cache, options.write_cache)?;
    resolver.stamp_version_file(&version, submodule)?;

    let install_requires = collect_install_requires(root, settings, env, &version, submodule);

    let mut metadata = default_setup_args(root, settings, env, &version, submodule)?;
    metadata.install_requires = install_requires;
    Ok(metadata)
}

/// Default location of the metadata document handed to the packaging step.
pub fn default_metadata_path(root: &Path) -> PathBuf {
    root.join("build").join("agbuild-setup.json")
}
