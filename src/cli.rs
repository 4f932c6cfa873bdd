//! CLI argument definitions for agbuild.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agbuild")]
#[command(version)]
#[command(about = "Version stamping, dependency aggregation and install hooks for AutoGluon builds", long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n    RELEASE                  Any non-empty value builds a stable release (no nightly suffix)\n    AUTOGLUON_PACKAGE_NAME   Distribution name; a name containing 'lite' enables lite mode\n    AGBUILD_QUIET            Set to 1 to hide progress lines"
)]
pub struct Cli {
    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Checkout root
    #[arg(long, global = true, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Settings file (defaults to agbuild.yaml under the root when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options controlling the `VERSION.minor` suffix cache
#[derive(Args, Debug, Clone, Default)]
pub struct CacheArgs {
    /// Ignore a cached suffix and use today's date
    #[arg(long)]
    pub no_cache: bool,
    /// Save the suffix to VERSION.minor for later builds
    #[arg(long)]
    pub write_cache: bool,
}

#[derive(Args, Debug, Clone)]
pub struct HookArgs {
    /// Write child process output to a log file instead of the console
    #[arg(long)]
    pub log_file: bool,
    /// Install or upgrade the package manager before failing on a script error
    #[arg(long)]
    pub bootstrap_pm: bool,
    /// Skip the standard packaging step and only run the post-step script
    #[arg(long)]
    pub skip_standard: bool,
    /// Where to write the setup metadata (default: build/agbuild-setup.json)
    #[arg(long, value_name = "FILE")]
    pub metadata_output: Option<PathBuf>,
    #[command(flatten)]
    pub cache: CacheArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the version being built
    Version {
        #[command(flatten)]
        cache: CacheArgs,
    },
    /// Resolve the version and write version.py
    Stamp {
        /// Submodule to stamp (omit for the namespace root)
        #[arg(long)]
        submodule: Option<String>,
        #[command(flatten)]
        cache: CacheArgs,
    },
    /// Print the aggregated install requirements
    Deps {
        /// Only this submodule's own requirements
        #[arg(long)]
        submodule: Option<String>,
        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Check dependency specifiers
    Validate {
        /// Specifiers such as "numpy>=1.25.0,<2.1.4"
        #[arg(required = true, value_name = "SPEC")]
        specs: Vec<String>,
    },
    /// Print or write the complete setup metadata
    Metadata {
        /// Build metadata for this submodule instead of the top-level package
        #[arg(long)]
        submodule: Option<String>,
        /// Write to a file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
        #[command(flatten)]
        cache: CacheArgs,
    },
    /// Prepare metadata, run the install step, then the post-install script
    Install(HookArgs),
    /// Prepare metadata, run the build step, then the post-build script
    Build(HookArgs),
    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Show agbuild's own version
    SelfVersion {
        /// Include commit and build date
        #[arg(long, short)]
        verbose: bool,
    },
}
