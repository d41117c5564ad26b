//! Reload the bang file when it changes on disk.
//!
//! The watcher observes the file's parent directory rather than the file
//! itself; editors that save by writing a temp file and renaming it over
//! the bang file would otherwise detach a file-level watch after the first
//! save.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self as std_mpsc, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use bangs_core::BangsManager;
use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

/// Quiet period after the last event before reloading.
const DEBOUNCE: Duration = Duration::from_millis(200);

/// A running file watcher. Dropping it stops the watch thread.
#[derive(Debug)]
pub struct BangFileWatcher {
    watcher: RecommendedWatcher,
    handle: JoinHandle<()>,
}

impl BangFileWatcher {
    /// Start watching the manager's bang file.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no file name or the platform
    /// watcher cannot be created.
    pub fn spawn(manager: Arc<BangsManager>) -> Result<Self> {
        let path = manager.path().to_path_buf();
        let file_name = path
            .file_name()
            .map(OsStr::to_os_string)
            .with_context(|| format!("Bangs file path has no file name: {}", path.display()))?;
        let dir = watch_dir(&path);

        let (watch_tx, watch_rx) = std_mpsc::channel();
        let mut watcher = RecommendedWatcher::new(watch_tx, NotifyConfig::default())
            .context("Failed to create file watcher")?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;

        let handle = thread::Builder::new()
            .name("bangs-watch".to_string())
            .spawn(move || watch_loop(&manager, &watch_rx, &file_name))
            .context("Failed to spawn watch thread")?;

        info!(path = %path.display(), "Watching bangs file for changes");
        Ok(Self { watcher, handle })
    }

    /// Stop watching and wait for the watch thread to exit.
    pub fn stop(self) {
        drop(self.watcher);
        if self.handle.join().is_err() {
            warn!("Watch thread panicked");
        }
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn watch_loop(
    manager: &BangsManager,
    watch_rx: &Receiver<notify::Result<Event>>,
    file_name: &OsStr,
) {
    // Ends when the watcher is dropped and the sender side disconnects
    while let Ok(message) = watch_rx.recv() {
        match message {
            Ok(event) if touches(&event, file_name) => {
                debug!(kind = ?event.kind, "Bangs file event");
                let disconnected = drain_burst(watch_rx);
                reload(manager);
                if disconnected {
                    return;
                }
            },
            Ok(_) => {},
            Err(err) => warn!("bangs watcher error: {err:?}"),
        }
    }
}

/// Swallow follow-up events until the file has been quiet for [`DEBOUNCE`].
///
/// Returns `true` if the channel disconnected meanwhile.
fn drain_burst(watch_rx: &Receiver<notify::Result<Event>>) -> bool {
    loop {
        match watch_rx.recv_timeout(DEBOUNCE) {
            Ok(_) => {},
            Err(RecvTimeoutError::Timeout) => return false,
            Err(RecvTimeoutError::Disconnected) => return true,
        }
    }
}

fn touches(event: &Event, file_name: &OsStr) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event
        .paths
        .iter()
        .any(|path| path.file_name() == Some(file_name))
}

fn reload(manager: &BangsManager) {
    match manager.reload() {
        Ok(diff) if diff.is_empty() => debug!("Bangs file changed, contents identical"),
        Ok(_) => info!(path = %manager.path().display(), "Reloaded bangs"),
        Err(err) => error!(
            path = %manager.path().display(),
            error = %err,
            category = err.category(),
            "Failed to reload bangs, keeping previous registry"
        ),
    }
}
