//! Concurrent line counting
//!
//! Scans a set of files in parallel, classifies every line as blank,
//! comment, or regular code, and folds the per-file tallies into printed
//! totals.

pub mod cli;
pub mod config;
pub mod display;
pub mod logging;
pub mod queue;
pub mod scanner;
