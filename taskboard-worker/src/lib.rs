//! # Taskboard Worker Library
//!
//! The due-date sweeper: a periodic job that completes pending tasks whose
//! `next_execute_date_time` has passed.
//!
//! ## Modules
//!
//! - `sweeper`: One sweep over the task store
//! - `scheduler`: Cancellable periodic trigger with start/stop lifecycle
//! - `config`: Environment-driven settings
//! - `shutdown`: Ctrl-C / SIGTERM handling shared by the binaries
//!
//! The API server embeds the same scheduler in-process; the
//! `taskboard-worker` binary runs it standalone.

pub mod config;
pub mod scheduler;
pub mod shutdown;
pub mod sweeper;
