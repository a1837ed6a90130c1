//! Runs every declared watch root concurrently until shutdown.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use regen_core::{
    application::{CommandRunner, GenerationService},
    error::RegenResult,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{
    dispatch::{DispatchLoop, TaskFn},
    filter::PathFilter,
    notify_source,
    task::watch_task,
};

const EVENT_BUFFER: usize = 256;

/// One root to watch and what to run when it settles.
pub struct WatchSession {
    pub filter: PathFilter,
    pub delay: Duration,
    pub task: TaskFn,
}

#[derive(Default)]
pub struct WatchSupervisor {
    sessions: Vec<WatchSession>,
}

impl WatchSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, session: WatchSession) -> &mut Self {
        self.sessions.push(session);
        self
    }

    /// One session per watch declared in the service's project. Roots are
    /// resolved against the project root.
    pub fn from_project(
        service: Arc<GenerationService>,
        runner: Arc<dyn CommandRunner>,
    ) -> RegenResult<Self> {
        let mut supervisor = Self::new();
        for spec in &service.project().watches {
            let root = spec.root.under(service.project_root());
            let filter = PathFilter::new(root, &spec.include, &spec.exclude)?;
            supervisor.add(WatchSession {
                filter,
                delay: spec.delay,
                task: watch_task(spec.action.clone(), Arc::clone(&service), Arc::clone(&runner)),
            });
        }
        Ok(supervisor)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Register every root and start one loop per root. Must be called from
    /// within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails if any root cannot be watched; loops already started are shut
    /// down first.
    pub fn spawn(self) -> RegenResult<WatchHandle> {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let mut handle = WatchHandle {
            shutdown,
            roots: Vec::new(),
            tasks: Vec::new(),
        };

        for session in self.sessions {
            let root = session.filter.root().to_path_buf();
            let started = notify_source::channel(EVENT_BUFFER).and_then(|(registrar, events)| {
                let mut lp = DispatchLoop::new(session.filter, session.delay, registrar, session.task);
                let count = lp.register_existing()?;
                Ok((lp, events, count))
            });

            let (lp, events, count) = match started {
                Ok(parts) => parts,
                Err(e) => {
                    handle.shutdown();
                    return Err(e);
                }
            };

            info!(root = %root.display(), directories = count, "watching");
            handle
                .tasks
                .push(tokio::spawn(lp.run(events, shutdown_rx.clone())));
            handle.roots.push(root);
        }

        Ok(handle)
    }
}

/// Handle over running watch loops.
pub struct WatchHandle {
    shutdown: watch::Sender<bool>,
    roots: Vec<PathBuf>,
    tasks: Vec<JoinHandle<()>>,
}

impl WatchHandle {
    /// Signal every loop to stop. Pending debounced dispatches are dropped.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn contains(&self, root: &Path) -> bool {
        self.roots.iter().any(|r| r == root)
    }

    /// Wait for every loop to finish.
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "watch loop ended abnormally");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    fn session(root: &Path, include: &str, task: TaskFn) -> WatchSession {
        WatchSession {
            filter: PathFilter::new(root, &[include.to_string()], &[]).unwrap(),
            delay: Duration::from_millis(100),
            task,
        }
    }

    #[tokio::test]
    async fn missing_root_fails_to_spawn() {
        let dir = TempDir::new().unwrap();
        let mut supervisor = WatchSupervisor::new();
        supervisor.add(session(&dir.path().join("nope"), ".*", Arc::new(|_: PathBuf| {})));

        assert!(supervisor.spawn().is_err());
    }

    #[tokio::test]
    async fn shutdown_stops_every_loop() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let mut supervisor = WatchSupervisor::new();
        supervisor
            .add(session(a.path(), ".*", Arc::new(|_: PathBuf| {})))
            .add(session(b.path(), ".*", Arc::new(|_: PathBuf| {})));

        let handle = supervisor.spawn().unwrap();
        assert_eq!(handle.roots().len(), 2);
        assert!(handle.contains(a.path()));

        handle.shutdown();
        tokio::time::timeout(Duration::from_secs(5), handle.join())
            .await
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn file_write_dispatches_task() {
        let dir = TempDir::new().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task: TaskFn = Arc::new(move |path: PathBuf| {
            let _ = tx.send(path);
        });

        let mut supervisor = WatchSupervisor::new();
        supervisor.add(session(dir.path(), r"\.txt$", task));
        let handle = supervisor.spawn().unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        let target = dir.path().join("note.txt");
        std::fs::write(&target, "hello").unwrap();

        let got = tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(got.ends_with("note.txt"));

        handle.shutdown();
        handle.join().await;
    }
}
