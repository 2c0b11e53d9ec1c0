//! Settings file watcher for hot reload.
//!
//! `notify` delivers events on its own thread; they are forwarded over an
//! mpsc channel and drained on the editor's thread through [`SettingsWatcher::poll`].

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};

pub use crate::settings::default_settings_path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEvent {
    Modified,
    Created,
    Deleted,
    Error(String),
}

pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<SettingsEvent>,
    path: PathBuf,
}

impl SettingsWatcher {
    /// Watch `path` through its parent directory, falling back to the file itself.
    pub fn new(path: &Path) -> crate::error::EditorResult<Self> {
        let (tx, rx) = channel();
        let target = path.to_path_buf();
        let filter_path = target.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                let event = match res {
                    Ok(ev) => {
                        if !ev.paths.is_empty() && !ev.paths.iter().any(|p| p.ends_with(file_name(&filter_path))) {
                            return;
                        }
                        match ev.kind {
                            EventKind::Modify(_) => SettingsEvent::Modified,
                            EventKind::Create(_) => SettingsEvent::Created,
                            EventKind::Remove(_) => SettingsEvent::Deleted,
                            _ => return,
                        }
                    }
                    Err(err) => SettingsEvent::Error(err.to_string()),
                };
                // The receiver is gone once the watcher is dropped
                let _ = tx.send(event);
            },
            Config::default(),
        )?;

        // Atomic saves replace the file, so the directory is what stays watchable
        let parent = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if watcher.watch(parent, RecursiveMode::NonRecursive).is_err() {
            watcher.watch(&target, RecursiveMode::NonRecursive)?;
        }
        tracing::debug!(path = %target.display(), "Watching settings file");

        Ok(Self {
            _watcher: watcher,
            rx,
            path: target,
        })
    }

    /// Watch the default settings location.
    pub fn for_default_path() -> Option<Self> {
        let path = default_settings_path()?;
        match Self::new(&path) {
            Ok(w) => Some(w),
            Err(e) => {
                tracing::error!("Failed to start settings watcher: {}", e);
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Latest pending event, collapsing bursts (editors often write twice).
    pub fn poll(&mut self) -> Option<SettingsEvent> {
        let mut last = None;
        loop {
            match self.rx.try_recv() {
                Ok(event) => last = Some(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Some(SettingsEvent::Error("settings watcher disconnected".into()));
                }
            }
        }
        last
    }
}

fn file_name(path: &Path) -> &Path {
    path.file_name().map(Path::new).unwrap_or(path)
}
