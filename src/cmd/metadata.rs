//! `metadata` command.

use anyhow::Result;
use std::path::Path;

use agbuild::metadata::prepare_metadata;
use agbuild::ui;

use super::BuildContext;
use crate::cli::CacheArgs;

pub fn cmd_metadata(
    ctx: &BuildContext,
    submodule: Option<String>,
    output: Option<&Path>,
    cache: &CacheArgs,
) -> Result<()> {
    let options = ctx.prepare_options(submodule, cache);
    let metadata = prepare_metadata(&ctx.root, &ctx.settings, &ctx.env, &options)?;

    match output {
        Some(path) => {
            metadata.write_to(path)?;
            ui::success(&format!(
                "Wrote metadata for {} {} to {}",
                ui::colors::identifier(&metadata.name),
                metadata.version,
                path.display()
            ));
        }
        None => println!("{}", metadata.to_json()?),
    }

    Ok(())
}
