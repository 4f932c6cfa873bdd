//! Version resolution and version-file stamping.
//!
//! The base version lives in `core/src/autogluon/VERSION`. Non-release builds
//! get a nightly suffix (`b` followed by the build date, or whatever is cached
//! in `VERSION.minor`), and the resolved version is stamped into a
//! `version.py` inside each package directory for runtime introspection.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::BuildEnv;
use crate::paths::{NAMESPACE_DIR, STAMP_FILE_NAME, VERSION_FILE, VERSION_MINOR_FILE};
use crate::ui;

/// Namespace named in the stamp file docstring
const NAMESPACE: &str = "autogluon";

const STAMP_TEMPLATE: &str = r#""""This is the {{ namespace }} version file."""
__version__ = '{{ version }}'
__lite__ = {{ lite }}
"#;

#[derive(Debug)]
pub enum VersionError {
    NotFound(PathBuf),
    Empty(PathBuf),
    Io { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for VersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionError::NotFound(path) => {
                write!(f, "VERSION file not found at {}", path.display())
            }
            VersionError::Empty(path) => write!(f, "VERSION file {} is empty", path.display()),
            VersionError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for VersionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VersionError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Read and trim a version string.
pub fn load_version(path: &Path) -> std::result::Result<String, VersionError> {
    if !path.is_file() {
        return Err(VersionError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| VersionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let version = content.trim();
    if version.is_empty() {
        return Err(VersionError::Empty(path.to_path_buf()));
    }

    Ok(version.to_string())
}

/// Nightly suffix for a build date: `bYYYYMMDD`
pub fn date_suffix(date: NaiveDate) -> String {
    date.format("b%Y%m%d").to_string()
}

/// Render the contents of a `version.py` stamp.
pub fn render_stamp(version: &str, lite: bool) -> Result<String> {
    let mut context = tera::Context::new();
    context.insert("namespace", NAMESPACE);
    context.insert("version", version);
    context.insert("lite", if lite { "True" } else { "False" });

    tera::Tera::one_off(STAMP_TEMPLATE, &context, false).context("Failed to render version stamp")
}

/// Resolves and stamps versions for one checkout.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    root: PathBuf,
    release: bool,
    lite: bool,
}

impl VersionResolver {
    pub fn new(root: &Path, env: &BuildEnv) -> Self {
        Self {
            root: root.to_path_buf(),
            release: env.release,
            lite: env.lite,
        }
    }

    pub fn version_file(&self) -> PathBuf {
        self.root.join(VERSION_FILE)
    }

    pub fn cache_file(&self) -> PathBuf {
        self.root.join(VERSION_MINOR_FILE)
    }

    pub fn load_version(&self) -> std::result::Result<String, VersionError> {
        let path = self.version_file();
        ui::info(&format!("Looking for VERSION file at: {}", path.display()));
        load_version(&path)
    }

    /// Work out the nightly suffix: the cached one when allowed and present,
    /// otherwise today's date.
    pub fn compute_suffix(&self, use_cache: bool) -> Result<String> {
        let cache = self.cache_file();

        if use_cache && cache.is_file() {
            let cached = fs::read_to_string(&cache)
                .with_context(|| format!("Failed to read {}", cache.display()))?;
            let cached = cached.trim();
            if cached.is_empty() {
                anyhow::bail!("{} is empty", cache.display());
            }
            return Ok(cached.to_string());
        }

        Ok(date_suffix(Local::now().date_naive()))
    }

    /// Append the nightly suffix unless this is a release build.
    ///
    /// Suffixing is best effort: if the suffix cannot be worked out the base
    /// version comes back unchanged. With `write_cache` the suffix is saved
    /// to `VERSION.minor` so later invocations reuse it.
    pub fn update_version(&self, version: &str, use_cache: bool, write_cache: bool) -> String {
        if self.release {
            return version.to_string();
        }

        let suffix = match self.compute_suffix(use_cache) {
            Ok(suffix) => suffix,
            Err(_) => return version.to_string(),
        };

        if write_cache {
            if let Err(e) = self.write_cache(&suffix) {
                ui::warn(&format!("Failed to cache build suffix: {:#}", e));
            }
        }

        format!("{}{}", version, suffix)
    }

    fn write_cache(&self, suffix: &str) -> Result<()> {
        let cache = self.cache_file();
        if let Some(parent) = cache.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&cache, suffix).with_context(|| format!("Failed to write {}", cache.display()))
    }

    /// Load the base version and apply the suffix policy in one step.
    pub fn resolve(&self, use_cache: bool, write_cache: bool) -> Result<String> {
        let base = self.load_version()?;
        Ok(self.update_version(&base, use_cache, write_cache))
    }

    /// Location of the stamp file for a submodule, or for the namespace root.
    pub fn stamp_path(&self, submodule: Option<&str>) -> PathBuf {
        let dir = self.root.join(NAMESPACE_DIR);
        match submodule {
            Some(sub) => dir.join(sub).join(STAMP_FILE_NAME),
            None => dir.join(STAMP_FILE_NAME),
        }
    }

    /// Write `version.py` for `submodule`, creating directories as needed.
    pub fn stamp_version_file(&self, version: &str, submodule: Option<&str>) -> Result<PathBuf> {
        if let Some(sub) = submodule {
            validate_submodule_name(sub)?;
        }

        ui::info(&format!("Building version {}", version));

        let path = self.stamp_path(submodule);
        let dir = path
            .parent()
            .context("Stamp path has no parent directory")?
            .to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;

        ui::info(&format!("Creating version file at: {}", path.display()));

        let content = render_stamp(version, self.lite)?;

        // Write beside the target and rename so readers never see half a file
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(path)
    }
}

fn validate_submodule_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        anyhow::bail!(
            "Invalid submodule name '{}': use letters, digits and underscores only",
            name
        );
    }
    Ok(())
}
