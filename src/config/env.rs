//! Build environment captured once at process start.

use super::Settings;

/// Set to any non-empty value for a stable release build
pub const RELEASE_VAR: &str = "RELEASE";
/// Overrides the distribution name; a name containing `lite` enables lite mode
pub const PACKAGE_NAME_VAR: &str = "AUTOGLUON_PACKAGE_NAME";

/// Process-level build switches.
///
/// Read from the environment in `main` and passed down explicitly so that
/// nothing below the entry point consults environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEnv {
    /// Stable release: no build suffix, no suffix cache, stable classifier
    pub release: bool,
    /// Distribution name for the top-level package
    pub package_name: String,
    /// Lite build: heavier optional dependencies are pruned
    pub lite: bool,
}

impl BuildEnv {
    pub fn new(release: bool, package_name: impl Into<String>) -> Self {
        let package_name = package_name.into();
        let lite = package_name.contains("lite");
        Self {
            release,
            package_name,
            lite,
        }
    }

    /// Capture the environment, falling back to the configured package name.
    pub fn from_env(settings: &Settings) -> Self {
        Self::from_vars(
            std::env::var(RELEASE_VAR).ok(),
            std::env::var(PACKAGE_NAME_VAR).ok(),
            &settings.package.name,
        )
    }

    pub fn from_vars(
        release: Option<String>,
        package_name: Option<String>,
        default_name: &str,
    ) -> Self {
        let release = release.is_some_and(|v| !v.is_empty());
        let package_name = package_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| default_name.to_string());
        Self::new(release, package_name)
    }

    /// Distribution name for a submodule, or the top-level name.
    pub fn distribution_name(&self, submodule: Option<&str>) -> String {
        match submodule {
            Some(sub) => format!("{}.{}", self.package_name, sub),
            None => self.package_name.clone(),
        }
    }
}

impl Default for BuildEnv {
    fn default() -> Self {
        Self::new(false, super::defaults::default_package_name())
    }
}
