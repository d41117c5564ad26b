//! Check command implementation

use std::path::Path;

use anyhow::{Context, Result};
use bangs_core::Registry;

/// Validate the bang file and summarize it.
///
/// A malformed file is an error; a default that names a missing bang is
/// reported but still passes, matching how the server treats it at startup.
pub fn execute(path: &Path) -> Result<()> {
    let registry = Registry::load(path)
        .with_context(|| format!("Invalid bangs file {}", path.display()))?;

    println!("{}", summarize(path, &registry));
    if let Err(err) = registry.check_default() {
        println!("warning: default '{}' does not resolve: {err}", registry.default_target());
    }
    Ok(())
}

fn summarize(path: &Path, registry: &Registry) -> String {
    format!(
        "{}: {} bangs, {} aliases, default '{}'",
        path.display(),
        registry.bangs().len(),
        registry.aliases().len(),
        registry.default_target()
    )
}
