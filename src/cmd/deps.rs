//! `deps` and `validate` commands.

use anyhow::Result;

use agbuild::deps::validate;
use agbuild::metadata::collect_install_requires;
use agbuild::ui;
use agbuild::version::VersionResolver;

use super::BuildContext;

/// Print the install requirements the top-level package (or one submodule) would get
pub fn cmd_deps(ctx: &BuildContext, submodule: Option<&str>, json: bool) -> Result<()> {
    // Descriptors may pin to the version being built; never touch the cache here
    let version = VersionResolver::new(&ctx.root, &ctx.env).resolve(true, false)?;

    let deps = collect_install_requires(&ctx.root, &ctx.settings, &ctx.env, &version, submodule);

    if json {
        println!("{}", serde_json::to_string_pretty(&deps)?);
    } else {
        for dep in &deps {
            println!("{}", dep);
        }
    }

    ui::info(&format!("{} requirement(s)", deps.len()));
    Ok(())
}

/// Report whether each specifier is valid; fails if any is not
pub fn cmd_validate(specs: &[String]) -> Result<()> {
    let mut invalid = 0;

    for spec in specs {
        if validate(spec) {
            println!("{} {}", ui::colors::success("valid  "), spec);
        } else {
            println!("{} {}", ui::colors::error("invalid"), spec);
            invalid += 1;
        }
    }

    if invalid > 0 {
        anyhow::bail!("{} of {} specifier(s) are invalid", invalid, specs.len());
    }
    Ok(())
}
