//! Live regeneration: watch roots, debounce bursts of writes, dispatch
//! watch actions.

mod dispatch;
mod filter;
mod notify_source;
mod supervisor;
mod task;

pub use dispatch::{
    DirectoryRegistrar, DispatchLoop, TaskFn, WatchEvent, WatchEventKind, WatchMessage,
};
pub use filter::PathFilter;
pub use notify_source::{NotifyRegistrar, channel};
pub use supervisor::{WatchHandle, WatchSession, WatchSupervisor};
pub use task::{ActionSummary, expand_command, run_action, watch_task};
