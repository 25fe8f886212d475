//! Rollout scheduling: which window applies now, what the worker may do next, and
//! when a queued item is likely to be processed.
//!
//! A `Configuration` is an immutable snapshot of the configured windows, safe to
//! share between threads. Reloading means building a new one and swapping it in.

mod configuration;
mod estimate;
mod schedule;

pub use configuration::{validate_configuration, Configuration, Validity};
pub use schedule::Schedule;
