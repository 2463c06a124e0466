// src/monitor/mod.rs
// =============================================================================
// This module contains the job-monitoring core.
//
// Submodules:
// - classify: status classes and the view filter
// - progress: derives a display percentage from raw counters
// - poll: the monitoring session (start/stop a job, poll it to the end)
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod classify;
mod poll;
mod progress;

// Re-export public items from submodules
// This lets users write `monitor::classify()` instead of
// `monitor::classify::classify()`
pub use classify::{classify, StatusClass, ViewMode};
pub use poll::{
    MonitorSession, PollEvent, PollOutcome, StopHandle, WatchOptions, DEFAULT_POLL_INTERVAL,
};
pub use progress::{compute_progress, Progress};
