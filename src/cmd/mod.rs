//! Command module structure for the agbuild CLI

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use agbuild::config::{BuildEnv, Settings};
use agbuild::metadata::PrepareOptions;

use crate::cli::CacheArgs;

pub mod deps;
pub mod hook;
pub mod metadata;
pub mod util;
pub mod version;

/// Everything a command needs about the checkout, resolved once in `main`.
pub struct BuildContext {
    pub root: PathBuf,
    pub settings: Settings,
    pub env: BuildEnv,
}

impl BuildContext {
    /// Load settings and capture the build environment.
    pub fn load(root: &Path, config: Option<&Path>) -> Result<Self> {
        if !root.is_dir() {
            anyhow::bail!("Checkout root {} is not a directory", root.display());
        }
        let root = root
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", root.display()))?;

        let settings = Settings::load_or_default(&root, config)?;
        let env = BuildEnv::from_env(&settings);

        Ok(Self {
            root,
            settings,
            env,
        })
    }

    pub fn prepare_options(&self, submodule: Option<String>, cache: &CacheArgs) -> PrepareOptions {
        PrepareOptions {
            submodule,
            no_cache: cache.no_cache,
            write_cache: cache.write_cache,
        }
    }
}
