//! `install` and `build` commands: prepare metadata, run the standard step,
//! then the platform post-step script.

use anyhow::{Context, Result};

use agbuild::hooks::{HookOptions, HookOutcome, HookRunner, Step};
use agbuild::metadata::{default_metadata_path, prepare_metadata};
use agbuild::ui;

use super::BuildContext;
use crate::cli::HookArgs;

pub fn cmd_hook(ctx: &BuildContext, step: Step, args: &HookArgs) -> Result<()> {
    let options = ctx.prepare_options(None, &args.cache);
    let metadata = prepare_metadata(&ctx.root, &ctx.settings, &ctx.env, &options)?;

    // Children run in the checkout root, so hand them an absolute path
    let metadata_path = match &args.metadata_output {
        Some(path) => std::env::current_dir()
            .context("Failed to read the current directory")?
            .join(path),
        None => default_metadata_path(&ctx.root),
    };
    metadata.write_to(&metadata_path)?;
    ui::info(&format!(
        "Setup metadata for {} {} written to {}",
        metadata.name,
        metadata.version,
        metadata_path.display()
    ));

    let hook_options = HookOptions {
        bootstrap_pm: args.bootstrap_pm,
        log_to_file: args.log_file,
        skip_standard: args.skip_standard,
        ..HookOptions::from_env(&ctx.env)
    };
    let runner = HookRunner::new(&ctx.root, &ctx.settings.hooks, hook_options);

    match runner.run(step, Some(&metadata_path))? {
        HookOutcome::ScriptCompleted { log: Some(log), .. } => {
            ui::success(&format!("{} finished, log at {}", step, log.display()));
        }
        HookOutcome::ScriptCompleted { log: None, .. } | HookOutcome::ScriptMissing { .. } => {
            ui::success(&format!("{} finished", step));
        }
    }

    Ok(())
}
