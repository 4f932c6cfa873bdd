//! `version` and `stamp` commands.

use anyhow::Result;

use agbuild::ui;
use agbuild::version::VersionResolver;

use super::BuildContext;
use crate::cli::CacheArgs;

/// Print the version this build would use
pub fn cmd_version(ctx: &BuildContext, cache: &CacheArgs) -> Result<()> {
    let resolver = VersionResolver::new(&ctx.root, &ctx.env);
    let version = resolver.resolve(!cache.no_cache, cache.write_cache)?;
    println!("{}", version);
    Ok(())
}

/// Resolve the version and write the stamp file
pub fn cmd_stamp(ctx: &BuildContext, submodule: Option<&str>, cache: &CacheArgs) -> Result<()> {
    let resolver = VersionResolver::new(&ctx.root, &ctx.env);
    let version = resolver.resolve(!cache.no_cache, cache.write_cache)?;
    let path = resolver.stamp_version_file(&version, submodule)?;

    ui::success(&format!(
        "Stamped {} into {}",
        ui::colors::identifier(&version),
        path.display()
    ));
    println!("{}", version);
    Ok(())
}
