//! Serve command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use bangs_core::{BangsManager, ResolvePolicy};

use crate::server::{self, AppState};
use crate::watch::BangFileWatcher;

/// Load the bang file, optionally watch it, and run the HTTP service.
pub async fn execute(path: &Path, port: u16, watch: bool, policy: ResolvePolicy) -> Result<()> {
    let manager = Arc::new(
        BangsManager::load(path)
            .with_context(|| format!("Failed to load bangs from {}", path.display()))?,
    );

    let watcher = if watch {
        Some(BangFileWatcher::spawn(Arc::clone(&manager))?)
    } else {
        None
    };

    let result = server::serve(AppState::new(manager, policy), port).await;

    if let Some(watcher) = watcher {
        watcher.stop();
    }
    result
}
