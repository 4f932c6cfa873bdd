//! Default values and settings structs with default implementations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Macro to generate default functions for serde attributes
macro_rules! default_fn {
    ($name:ident, $type:ty, $value:expr) => {
        pub(crate) fn $name() -> $type {
            $value
        }
    };
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn string_map(items: &[(&str, &str)]) -> BTreeMap<String, String> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =========================================================================
// DEFAULT VALUE FUNCTIONS
// =========================================================================

default_fn!(default_package_name, String, "autogluon".to_string());
default_fn!(default_author, String, "AutoGluon Community".to_string());
default_fn!(
    default_url,
    String,
    "https://github.com/autogluon/autogluon".to_string()
);
default_fn!(
    default_description,
    String,
    "Fast and Accurate ML in 3 Lines of Code".to_string()
);
default_fn!(default_license, String, "Apache-2.0".to_string());
default_fn!(
    default_license_files,
    Vec<String>,
    strings(&["../LICENSE", "../NOTICE"])
);
default_fn!(default_python_requires, String, ">=3.9, <3.13".to_string());
default_fn!(default_source_dir, String, "core/src".to_string());
default_fn!(default_include_pattern, String, "autogluon*".to_string());
default_fn!(
    default_classifiers,
    Vec<String>,
    strings(&[
        "Intended Audience :: Education",
        "Intended Audience :: Developers",
        "Intended Audience :: Science/Research",
        "License :: OSI Approved :: Apache Software License",
        "Operating System :: MacOS",
        "Operating System :: Microsoft :: Windows",
        "Operating System :: POSIX",
        "Programming Language :: Python :: 3.9",
        "Programming Language :: Python :: 3.10",
        "Programming Language :: Python :: 3.11",
        "Programming Language :: Python :: 3.12",
        "Topic :: Software Development",
        "Topic :: Scientific/Engineering :: Artificial Intelligence",
        "Topic :: Scientific/Engineering :: Information Analysis",
        "Topic :: Scientific/Engineering :: Image Recognition",
    ])
);
default_fn!(
    default_project_urls,
    BTreeMap<String, String>,
    string_map(&[
        ("Documentation", "https://auto.gluon.ai"),
        ("Bug Reports", "https://github.com/autogluon/autogluon/issues"),
        ("Source", "https://github.com/autogluon/autogluon/"),
        (
            "Contribute!",
            "https://github.com/autogluon/autogluon/blob/master/CONTRIBUTING.md"
        ),
    ])
);
default_fn!(
    default_dependency_table,
    BTreeMap<String, String>,
    string_map(&[
        ("boto3", ">=1.10,<2"),
        ("numpy", ">=1.25.0,<2.1.4"),
        ("pandas", ">=2.0.0,<2.3.0"),
        ("scikit-learn", ">=1.4.0,<1.5.3"),
        ("scipy", ">=1.5.4,<1.16"),
        ("matplotlib", ">=3.7.0,<3.11"),
        ("psutil", ">=5.7.3,<7.0.0"),
        ("s3fs", ">=2023.1,<2025"),
        ("networkx", ">=3.0,<4"),
        ("tqdm", ">=4.38,<5"),
        ("Pillow", ">=10.0.1,<12"),
        ("torch", ">=2.2,<2.6"),
        ("lightning", ">=2.2,<2.6"),
        ("async_timeout", ">=4.0,<6"),
        ("transformers[sentencepiece]", ">=4.38.0,<5"),
        ("accelerate", ">=0.34.0,<1.0"),
    ])
);
default_fn!(
    default_lite_excluded,
    Vec<String>,
    strings(&["psutil", "Pillow", "timm"])
);
default_fn!(default_descriptor_name, String, "setup.yaml".to_string());
default_fn!(
    default_excluded_dirs,
    Vec<String>,
    strings(&["CI", "release_instructions", "tests", "examples", "docs"])
);
default_fn!(
    default_install_command,
    Vec<String>,
    strings(&["python", "setup.py", "install"])
);
default_fn!(
    default_build_command,
    Vec<String>,
    strings(&["python", "setup.py", "bdist_wheel"])
);
default_fn!(default_scripts_dir, String, ".".to_string());
default_fn!(default_log_dir, String, ".agbuild/logs".to_string());
default_fn!(
    default_bootstrap_commands,
    Vec<Vec<String>>,
    vec![
        strings(&["python", "-m", "ensurepip", "--upgrade"]),
        strings(&["python", "-m", "pip", "install", "--upgrade", "pip"]),
    ]
);
default_fn!(default_true, bool, true);

// =========================================================================
// SETTINGS STRUCTS WITH DEFAULTS
// =========================================================================

/// Package identity and setup metadata defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PackageSettings {
    /// Package name used when `AUTOGLUON_PACKAGE_NAME` is unset
    #[serde(default = "default_package_name")]
    pub name: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_license")]
    pub license: String,
    #[serde(default = "default_license_files")]
    pub license_files: Vec<String>,
    #[serde(default = "default_python_requires")]
    pub python_requires: String,
    /// Directory searched for namespace packages, relative to the root
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    /// Glob applied to dotted package names
    #[serde(default = "default_include_pattern")]
    pub include: String,
    /// Trove classifiers appended after the development status
    #[serde(default = "default_classifiers")]
    pub classifiers: Vec<String>,
    #[serde(default = "default_project_urls")]
    pub project_urls: BTreeMap<String, String>,
    #[serde(default = "default_true")]
    pub zip_safe: bool,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            name: default_package_name(),
            author: default_author(),
            url: default_url(),
            description: default_description(),
            license: default_license(),
            license_files: default_license_files(),
            python_requires: default_python_requires(),
            source_dir: default_source_dir(),
            include: default_include_pattern(),
            classifiers: default_classifiers(),
            project_urls: default_project_urls(),
            zip_safe: true,
        }
    }
}

/// Shared dependency table and descriptor discovery
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DependencySettings {
    /// Version ranges for packages shared across submodules
    #[serde(default = "default_dependency_table")]
    pub table: BTreeMap<String, String>,
    /// Entries layered over `table` (added or replaced)
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
    /// Packages dropped from the table in lite mode
    #[serde(default = "default_lite_excluded")]
    pub lite_excluded: Vec<String>,
    /// File name of a submodule build descriptor
    #[serde(default = "default_descriptor_name")]
    pub descriptor: String,
    /// Directory names pruned during the descriptor scan
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,
}

impl Default for DependencySettings {
    fn default() -> Self {
        Self {
            table: default_dependency_table(),
            extra: BTreeMap::new(),
            lite_excluded: default_lite_excluded(),
            descriptor: default_descriptor_name(),
            excluded_dirs: default_excluded_dirs(),
        }
    }
}

/// Install/build step commands and post-step hooks
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HookSettings {
    /// Standard install step (program followed by arguments)
    #[serde(default = "default_install_command")]
    pub install_command: Vec<String>,
    /// Standard build step (program followed by arguments)
    #[serde(default = "default_build_command")]
    pub build_command: Vec<String>,
    /// Where post-step scripts live, relative to the root
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: String,
    /// Where hook logs are written, relative to the root
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// Commands that install or upgrade the package manager, run in order
    #[serde(default = "default_bootstrap_commands")]
    pub bootstrap_commands: Vec<Vec<String>>,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            install_command: default_install_command(),
            build_command: default_build_command(),
            scripts_dir: default_scripts_dir(),
            log_dir: default_log_dir(),
            bootstrap_commands: default_bootstrap_commands(),
        }
    }
}
