//! Per-root watch loop: directory registration, filtering and debounced
//! dispatch.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use regen_core::{application::ApplicationError, error::RegenResult};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, info_span, trace, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use super::filter::PathFilter;

/// Task invoked with the last qualifying path once a root settles.
pub type TaskFn = Arc<dyn Fn(PathBuf) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    Create,
    Write,
    Remove,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    pub path: PathBuf,
}

impl WatchEvent {
    pub fn new(kind: WatchEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// What the notification channel delivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchMessage {
    Event(WatchEvent),
    Error(String),
}

/// Adds a single directory (non-recursively) to the underlying watcher.
pub trait DirectoryRegistrar: Send {
    fn register(&mut self, dir: &Path) -> RegenResult<()>;
}

/// Watch loop for one root.
pub struct DispatchLoop<R> {
    root: PathBuf,
    filter: PathFilter,
    delay: Duration,
    registrar: R,
    task: TaskFn,
}

impl<R: DirectoryRegistrar> DispatchLoop<R> {
    pub fn new(filter: PathFilter, delay: Duration, registrar: R, task: TaskFn) -> Self {
        Self {
            root: filter.root().to_path_buf(),
            filter,
            delay,
            registrar,
            task,
        }
    }

    /// Register the root and every directory below it. Returns how many
    /// directories were registered.
    pub fn register_existing(&mut self) -> RegenResult<usize> {
        if !self.root.is_dir() {
            return Err(ApplicationError::WatchFailed {
                root: self.root.clone(),
                reason: "not a directory".into(),
            }
            .into());
        }
        let root = self.root.clone();
        self.register_tree(&root)
    }

    fn register_tree(&mut self, dir: &Path) -> RegenResult<usize> {
        let mut count = 0;
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::WatchFailed {
                root: self.root.clone(),
                reason: e.to_string(),
            })?;
            if entry.file_type().is_dir() {
                self.registrar.register(entry.path())?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Run until the channel closes or shutdown is signalled. A pending
    /// debounce is dropped on shutdown.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<WatchMessage>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let timer = sleep(self.delay);
        tokio::pin!(timer);
        let mut pending: Option<PathBuf> = None;

        while !*shutdown.borrow() {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        debug!(root = %self.root.display(), "shutdown handle dropped");
                        break;
                    }
                }
                message = events.recv() => match message {
                    None => {
                        debug!(root = %self.root.display(), "notification channel closed");
                        break;
                    }
                    Some(WatchMessage::Error(reason)) => {
                        warn!(root = %self.root.display(), error = %reason, "watch error");
                    }
                    Some(WatchMessage::Event(event)) => {
                        if self.handle(event, &mut pending) {
                            timer.as_mut().reset(Instant::now() + self.delay);
                        }
                    }
                },
                () = &mut timer, if pending.is_some() => {
                    if let Some(path) = pending.take() {
                        self.dispatch(path);
                    }
                }
            }
        }

        debug!(root = %self.root.display(), "watch loop finished");
    }

    /// Returns true when the event (re)arms the debounce timer.
    fn handle(&mut self, event: WatchEvent, pending: &mut Option<PathBuf>) -> bool {
        trace!(kind = ?event.kind, path = %event.path.display(), "event");

        if event.kind == WatchEventKind::Create && event.path.is_dir() {
            match self.register_tree(&event.path) {
                Ok(count) => {
                    debug!(path = %event.path.display(), count, "registered new directory")
                }
                Err(e) => {
                    warn!(path = %event.path.display(), error = %e, "cannot watch new directory")
                }
            }
        }

        if event.kind != WatchEventKind::Write || !self.filter.matches(&event.path) {
            return false;
        }

        *pending = Some(event.path);
        true
    }

    fn dispatch(&self, path: PathBuf) {
        let id = Uuid::new_v4();
        info!(
            root = %self.root.display(),
            path = %path.display(),
            dispatch = %id,
            "dispatching watch task"
        );

        let span = info_span!("watch_task", dispatch = %id);
        let task = Arc::clone(&self.task);
        tokio::task::spawn_blocking(move || span.in_scope(|| task(path)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<PathBuf>>>);

    impl DirectoryRegistrar for Recorder {
        fn register(&mut self, dir: &Path) -> RegenResult<()> {
            self.0.lock().unwrap().push(dir.to_path_buf());
            Ok(())
        }
    }

    struct Harness {
        events: mpsc::Sender<WatchMessage>,
        shutdown: watch::Sender<bool>,
        dispatched: mpsc::UnboundedReceiver<PathBuf>,
        join: tokio::task::JoinHandle<()>,
    }

    fn start(root: &Path, include: &[&str], exclude: &[&str]) -> Harness {
        let owned = |p: &[&str]| p.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let filter = PathFilter::new(root, &owned(include), &owned(exclude)).unwrap();

        let (done_tx, dispatched) = mpsc::unbounded_channel();
        let task: TaskFn = Arc::new(move |path: PathBuf| {
            let _ = done_tx.send(path);
        });

        let (events, events_rx) = mpsc::channel(64);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let lp = DispatchLoop::new(filter, Duration::from_millis(200), Recorder::default(), task);
        let join = tokio::spawn(lp.run(events_rx, shutdown_rx));

        Harness {
            events,
            shutdown,
            dispatched,
            join,
        }
    }

    fn write(path: &str) -> WatchMessage {
        WatchMessage::Event(WatchEvent::new(WatchEventKind::Write, path))
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_writes_collapses_into_one_dispatch_with_last_path() {
        let mut h = start(Path::new("/w"), &[".*"], &[]);

        for i in 0..5 {
            h.events.send(write(&format!("/w/file{i}.txt"))).await.unwrap();
            sleep(Duration::from_millis(50)).await;
        }

        assert_eq!(h.dispatched.recv().await.unwrap(), PathBuf::from("/w/file4.txt"));

        sleep(Duration::from_secs(5)).await;
        assert!(h.dispatched.try_recv().is_err());

        h.shutdown.send(true).unwrap();
        h.join.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_writes_to_one_file_dispatch_once() {
        let mut h = start(Path::new("/w"), &[".*"], &[]);

        for _ in 0..5 {
            h.events.send(write("/w/style.scss")).await.unwrap();
            sleep(Duration::from_millis(50)).await;
        }

        assert_eq!(h.dispatched.recv().await.unwrap(), PathBuf::from("/w/style.scss"));

        sleep(Duration::from_secs(5)).await;
        assert!(h.dispatched.try_recv().is_err());

        h.shutdown.send(true).unwrap();
        h.join.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn channel_error_does_not_stop_the_loop() {
        let mut h = start(Path::new("/w"), &[".*"], &[]);

        h.events.send(WatchMessage::Error("overflow".into())).await.unwrap();
        h.events.send(write("/w/after.txt")).await.unwrap();
        assert_eq!(h.dispatched.recv().await.unwrap(), PathBuf::from("/w/after.txt"));

        // An error inside the debounce window keeps the pending path.
        h.events.send(write("/w/pending.txt")).await.unwrap();
        sleep(Duration::from_millis(50)).await;
        h.events.send(WatchMessage::Error("io".into())).await.unwrap();
        assert_eq!(h.dispatched.recv().await.unwrap(), PathBuf::from("/w/pending.txt"));

        assert!(!h.join.is_finished());
        h.shutdown.send(true).unwrap();
        h.join.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn separated_writes_dispatch_separately() {
        let mut h = start(Path::new("/w"), &[".*"], &[]);

        h.events.send(write("/w/a")).await.unwrap();
        assert_eq!(h.dispatched.recv().await.unwrap(), PathBuf::from("/w/a"));

        h.events.send(write("/w/b")).await.unwrap();
        assert_eq!(h.dispatched.recv().await.unwrap(), PathBuf::from("/w/b"));

        h.shutdown.send(true).unwrap();
        h.join.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn excluded_and_non_write_events_never_dispatch() {
        let mut h = start(Path::new("/w"), &[r".*\.scss$"], &[r"^vendor/"]);

        h.events.send(write("/w/vendor/lib.scss")).await.unwrap();
        h.events.send(write("/w/main.css")).await.unwrap();
        h.events
            .send(WatchMessage::Event(WatchEvent::new(WatchEventKind::Remove, "/w/main.scss")))
            .await
            .unwrap();
        h.events.send(WatchMessage::Error("overflow".into())).await.unwrap();

        sleep(Duration::from_secs(5)).await;
        assert!(h.dispatched.try_recv().is_err());

        h.shutdown.send(true).unwrap();
        h.join.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn closed_channel_ends_the_loop() {
        let h = start(Path::new("/w"), &[".*"], &[]);
        drop(h.events);
        h.join.await.unwrap();
        drop(h.shutdown);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_drops_pending_dispatch() {
        let mut h = start(Path::new("/w"), &[".*"], &[]);

        h.events.send(write("/w/a")).await.unwrap();
        sleep(Duration::from_millis(50)).await;
        h.shutdown.send(true).unwrap();
        h.join.await.unwrap();

        sleep(Duration::from_secs(1)).await;
        assert!(h.dispatched.try_recv().is_err());
    }

    #[test]
    fn registers_root_and_existing_subdirectories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        std::fs::create_dir_all(dir.path().join("c")).unwrap();
        std::fs::write(dir.path().join("a/file.txt"), "").unwrap();

        let recorder = Recorder::default();
        let filter = PathFilter::new(dir.path(), &[], &[]).unwrap();
        let mut lp = DispatchLoop::new(
            filter,
            Duration::from_millis(10),
            recorder.clone(),
            Arc::new(|_: PathBuf| {}),
        );

        assert_eq!(lp.register_existing().unwrap(), 4);
        let registered = recorder.0.lock().unwrap().clone();
        assert_eq!(registered[0], dir.path());
        assert!(registered.contains(&dir.path().join("a/b")));
    }

    #[test]
    fn missing_root_cannot_be_watched() {
        let dir = TempDir::new().unwrap();
        let filter = PathFilter::new(dir.path().join("gone"), &[], &[]).unwrap();
        let mut lp = DispatchLoop::new(
            filter,
            Duration::from_millis(10),
            Recorder::default(),
            Arc::new(|_: PathBuf| {}),
        );
        assert!(lp.register_existing().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn created_directory_is_registered() {
        let dir = TempDir::new().unwrap();
        let recorder = Recorder::default();
        let filter = PathFilter::new(dir.path(), &[], &[]).unwrap();
        let lp = DispatchLoop::new(
            filter,
            Duration::from_millis(10),
            recorder.clone(),
            Arc::new(|_: PathBuf| {}),
        );

        let (events, events_rx) = mpsc::channel(8);
        let (_shutdown, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(lp.run(events_rx, shutdown_rx));

        let created = dir.path().join("new/inner");
        std::fs::create_dir_all(&created).unwrap();
        events
            .send(WatchMessage::Event(WatchEvent::new(
                WatchEventKind::Create,
                dir.path().join("new"),
            )))
            .await
            .unwrap();
        drop(events);
        join.await.unwrap();

        let registered = recorder.0.lock().unwrap().clone();
        assert_eq!(registered, vec![dir.path().join("new"), created]);
    }
}
