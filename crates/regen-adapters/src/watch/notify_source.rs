//! Bridge from `notify` callbacks to the async watch loop.

use std::path::Path;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher, event::ModifyKind};
use regen_core::{application::ApplicationError, error::RegenResult};
use tokio::sync::mpsc;
use tracing::trace;

use super::dispatch::{DirectoryRegistrar, WatchEvent, WatchEventKind, WatchMessage};

/// Owns the OS watcher. Dropping it closes the event channel.
pub struct NotifyRegistrar {
    watcher: RecommendedWatcher,
}

impl DirectoryRegistrar for NotifyRegistrar {
    fn register(&mut self, dir: &Path) -> RegenResult<()> {
        trace!(dir = %dir.display(), "registering directory");
        self.watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|e| {
                ApplicationError::WatchFailed {
                    root: dir.to_path_buf(),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

/// Create an OS watcher and the channel its events are forwarded to.
pub fn channel(capacity: usize) -> RegenResult<(NotifyRegistrar, mpsc::Receiver<WatchMessage>)> {
    let (tx, rx) = mpsc::channel(capacity);

    let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let messages = match res {
            Ok(event) => translate(event),
            Err(e) => vec![WatchMessage::Error(e.to_string())],
        };
        for message in messages {
            if tx.blocking_send(message).is_err() {
                break;
            }
        }
    })
    .map_err(|e| ApplicationError::WatchFailed {
        root: Default::default(),
        reason: e.to_string(),
    })?;

    Ok((NotifyRegistrar { watcher }, rx))
}

fn classify(kind: &EventKind) -> WatchEventKind {
    match kind {
        EventKind::Create(_) => WatchEventKind::Create,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => WatchEventKind::Write,
        EventKind::Remove(_) => WatchEventKind::Remove,
        _ => WatchEventKind::Other,
    }
}

fn translate(event: Event) -> Vec<WatchMessage> {
    let kind = classify(&event.kind);
    event
        .paths
        .into_iter()
        .map(|path| WatchMessage::Event(WatchEvent::new(kind, path)))
        .collect()
}
