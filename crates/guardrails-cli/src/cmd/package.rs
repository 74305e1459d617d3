use crate::output::print_json;
use anyhow::Context;
use guardrails_core::{config::Config, package};
use std::path::Path;

/// Zip every configured bundle into the output directory.
///
/// `out` is resolved against the repo root and defaults to the configured
/// `package.out_dir`. Bundle sources are resolved against `skill_root`,
/// which defaults to the repo root.
pub fn run(
    root: &Path,
    out: Option<&str>,
    skill_root: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let out_dir = root.join(out.unwrap_or(&config.package.out_dir));
    let skill_root = skill_root.unwrap_or(root);

    tracing::info!(
        skill_root = %skill_root.display(),
        out = %out_dir.display(),
        bundles = config.package.bundles.len(),
        "packaging bundles"
    );
    let built = package::build_packages(skill_root, &out_dir, &config.package.bundles)
        .context("failed to build packages")?;

    if json {
        return print_json(&built);
    }
    for b in &built {
        println!("{}", b.archive.display());
    }
    Ok(())
}
