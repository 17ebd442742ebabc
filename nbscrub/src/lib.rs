// nbscrub/src/lib.rs
//! # nbscrub CLI Application
//!
//! This crate provides the command-line interface for `nbscrub-core`: argument
//! parsing, logging, status output and the atomic write of the repaired
//! notebook.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
pub mod utils;

pub use commands::scrub::{run_scrub, ScrubOptions, ScrubOutcome};
