//! # agbuild - build orchestration for AutoGluon checkouts
//!
//! agbuild is the packaging helper that runs once per build of a multi-module
//! AutoGluon checkout. It resolves the version being built, stamps it into
//! every submodule, collects the dependency ranges each submodule declares,
//! and wires the post-install shell hooks around the packaging command.
//!
//! ## Modules
//!
//! - [`version`] - `VERSION` loading, nightly build suffixes and `version.py` stamping
//! - [`deps`] - dependency specifier validation and the shared version-range table
//! - [`manifest`] - submodule build descriptors and tree-wide aggregation
//! - [`metadata`] - setup metadata handed to the packaging command
//! - [`hooks`] - install/build runner with platform-specific post-step scripts
//! - [`config`] - `agbuild.yaml` settings and the process build environment
//! - [`ui`] - console output helpers
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use agbuild::config::{BuildEnv, Settings};
//! use agbuild::version::VersionResolver;
//!
//! let root = Path::new(".");
//! let settings = Settings::load_or_default(root, None).expect("Failed to load settings");
//! let env = BuildEnv::from_env(&settings);
//!
//! let resolver = VersionResolver::new(root, &env);
//! let base = resolver.load_version().expect("VERSION file missing");
//! let version = resolver.update_version(&base, true, false);
//! resolver.stamp_version_file(&version, Some("core")).expect("Failed to stamp");
//! ```

pub mod config;
pub mod deps;
pub mod hooks;
pub mod manifest;
pub mod metadata;
pub mod ui;
pub mod version;

/// Checkout-relative locations used across the build.
pub mod paths {
    /// Namespace package directory: `core/src/autogluon`
    pub const NAMESPACE_DIR: &str = "core/src/autogluon";
    /// Base version file: `core/src/autogluon/VERSION`
    pub const VERSION_FILE: &str = "core/src/autogluon/VERSION";
    /// Cached nightly suffix: `core/src/autogluon/VERSION.minor`
    pub const VERSION_MINOR_FILE: &str = "core/src/autogluon/VERSION.minor";
    /// Stamp file name written into each package directory
    pub const STAMP_FILE_NAME: &str = "version.py";
    /// Optional settings file at the checkout root
    pub const SETTINGS_FILE: &str = "agbuild.yaml";
    /// Long description source
    pub const README_FILE: &str = "README.md";
}

/// Generate a local timestamp in ISO 8601 format: `YYYY-MM-DDTHH:MM:SS`
pub fn local_now_iso() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}
