//! CLI entry point for agbuild.
//!
//! The process environment is read here, once, and handed to every command
//! through [`cmd::BuildContext`]. Failures print a message and exit non-zero;
//! a failing child process passes its own exit code through.

mod cli;
mod cmd;

use anyhow::Result;
use clap::Parser;

use agbuild::hooks::{HookError, Step};
use agbuild::ui;

use cli::{Cli, Commands};
use cmd::BuildContext;

fn main() {
    let code = match run() {
        Ok(()) => 0,
        Err(e) => {
            ui::error(&format!("{:#}", e));
            exit_code(&e)
        }
    };
    std::process::exit(code);
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<HookError>()
        .map(HookError::exit_code)
        .unwrap_or(1)
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.quiet {
        std::env::set_var("AGBUILD_QUIET", "1");
    }

    // Commands that need no checkout
    match &cli.command {
        Commands::Validate { specs } => return cmd::deps::cmd_validate(specs),
        Commands::Completion { shell } => return cmd::util::cmd_completion(*shell),
        Commands::SelfVersion { verbose } => return cmd::util::cmd_self_version(*verbose),
        _ => {}
    }

    let ctx = BuildContext::load(&cli.root, cli.config.as_deref())?;

    match cli.command {
        Commands::Version { cache } => cmd::version::cmd_version(&ctx, &cache),
        Commands::Stamp { submodule, cache } => {
            cmd::version::cmd_stamp(&ctx, submodule.as_deref(), &cache)
        }
        Commands::Deps { submodule, json } => {
            cmd::deps::cmd_deps(&ctx, submodule.as_deref(), json)
        }
        Commands::Metadata {
            submodule,
            output,
            cache,
        } => cmd::metadata::cmd_metadata(&ctx, submodule, output.as_deref(), &cache),
        Commands::Install(args) => cmd::hook::cmd_hook(&ctx, Step::Install, &args),
        Commands::Build(args) => cmd::hook::cmd_hook(&ctx, Step::Build, &args),
        Commands::Validate { .. } | Commands::Completion { .. } | Commands::SelfVersion { .. } => {
            Ok(())
        }
    }
}
