//! # buildcheck
//!
//! Checks a tracked repository for a new HEAD commit and, when one shows up,
//! builds it and mails the result.
//!
//! ## Flow
//!
//! - Reads the last inspected commit from the marker file ([`core::state`]).
//! - Captures the tracked repository position ([`git::repo`]).
//! - Stops early when nothing changed.
//! - Otherwise records the new commit ([`core::state`], [`git::tracking`]),
//!   runs the configure and build steps ([`exec`]) and reports the
//!   outcome ([`notifications`]).
//!
//! [`core::orchestrator`] sequences all of the above and maps the outcome to
//! an exit code.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod exec;
pub mod git;
pub mod logging;
pub mod notifications;
