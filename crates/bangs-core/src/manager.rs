//! Ownership of the active registry.
//!
//! [`BangsManager`] holds the registry behind an [`ArcSwap`]. Readers take a
//! snapshot with [`BangsManager::snapshot`] and keep it for the duration of a
//! request; nothing is locked while resolving. A reload builds and validates
//! a complete new [`Registry`] first and only then swaps it in, so a failed
//! reload leaves the previous registry active and readers never observe a
//! partially built one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, warn};

use crate::{Entry, Registry, RegistryDiff, Result};

/// The process's active bang registry and where it came from.
#[derive(Debug)]
pub struct BangsManager {
    path: PathBuf,
    active: ArcSwap<Registry>,
}

impl BangsManager {
    /// Load the initial registry from `path`.
    ///
    /// There is no previous registry to fall back to, so failure is
    /// returned to the caller.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let registry = Registry::load(&path)?;
        warn_on_dangling_default(&registry);
        log_contents(&registry);
        Ok(Self::with_registry(path, registry))
    }

    /// Wrap an already-built registry; `path` is used by later reloads.
    pub fn with_registry(path: impl Into<PathBuf>, registry: Registry) -> Self {
        Self {
            path: path.into(),
            active: ArcSwap::from_pointee(registry),
        }
    }

    /// The file reloads read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The currently active registry.
    pub fn snapshot(&self) -> Arc<Registry> {
        self.active.load_full()
    }

    /// Re-read the bang file and swap in the result.
    ///
    /// On error the active registry is left untouched.
    pub fn reload(&self) -> Result<RegistryDiff> {
        let registry = Registry::load(&self.path)?;
        warn_on_dangling_default(&registry);

        let diff = self.active.load().diff(&registry);
        diff.log();
        log_contents(&registry);

        self.active.store(Arc::new(registry));
        Ok(diff)
    }

    /// Copy of all entries keyed by logical name.
    pub fn list_all_bangs(&self) -> BTreeMap<String, Entry> {
        self.active.load().list_all_bangs().clone()
    }
}

fn warn_on_dangling_default(registry: &Registry) {
    if let Err(err) = registry.check_default() {
        warn!(default = %registry.default_target(), error = %err, "Default does not resolve");
    }
}

fn log_contents(registry: &Registry) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    let names: Vec<&str> = registry.list_all_bangs().keys().map(String::as_str).collect();
    debug!(?names, "All loaded bangs");
    if !registry.aliases().is_empty() {
        debug!(aliases = ?registry.aliases(), "All loaded aliases");
    }
}
