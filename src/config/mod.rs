//! Settings for agbuild runs.
//!
//! Settings come from an optional `agbuild.yaml` at the checkout root. Every
//! field has a default, so an empty or absent file yields the stock AutoGluon
//! layout. Process environment is read separately into [`BuildEnv`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::SETTINGS_FILE;

pub mod defaults;
pub mod env;

pub use defaults::*;
pub use env::*;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub package: PackageSettings,
    #[serde(default)]
    pub dependencies: DependencySettings,
    #[serde(default)]
    pub hooks: HookSettings,
}

impl Settings {
    /// Load settings from an explicit path, or from `agbuild.yaml` under
    /// `root` when it exists. Falls back to defaults otherwise.
    ///
    /// An explicit path that does not exist is an error.
    pub fn load_or_default(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let path = root.join(SETTINGS_FILE);
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Settings =
            serde_yaml::from_str(content).context("Failed to parse settings YAML")?;

        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.package.name.trim().is_empty() {
            anyhow::bail!("package.name cannot be empty");
        }
        if self.dependencies.descriptor.trim().is_empty() {
            anyhow::bail!("dependencies.descriptor cannot be empty");
        }
        if self.hooks.install_command.is_empty() {
            anyhow::bail!("hooks.install_command needs at least a program name");
        }
        if self.hooks.build_command.is_empty() {
            anyhow::bail!("hooks.build_command needs at least a program name");
        }
        if self.hooks.bootstrap_commands.iter().any(|c| c.is_empty()) {
            anyhow::bail!("hooks.bootstrap_commands entries cannot be empty");
        }
        Ok(())
    }
}

/// Expand `~` and `$VAR` in a settings path and anchor relative results at `root`.
pub fn resolve_path(root: &Path, raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .with_context(|| format!("Failed to expand path '{}'", raw))?;
    let path = PathBuf::from(expanded.as_ref());

    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(root.join(path))
    }
}
