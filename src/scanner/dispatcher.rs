//! Scan dispatch
//!
//! Fans file scans out across threads under a live-task throttle, waits
//! for every spawned scan, then terminates the aggregator and reports how
//! many files were requested versus processed.

use anyhow::{anyhow, Context, Result};
use crossbeam::sync::WaitGroup;
use log::debug;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::config::DEFAULT_CONCURRENCY_THRESHOLD;
use crate::queue::PendingQueue;
use crate::scanner::aggregator::ResultAggregator;
use crate::scanner::file_scanner::scan_into;

/// Dispatch lifecycle, entered strictly in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Dispatching,
    Draining,
    Terminating,
    Done,
}

/// Input versus aggregated file counts for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Number of paths handed to the dispatcher
    pub requested: usize,
    /// Number of tallies the aggregator consumed
    pub processed: usize,
}

/// Coordinates scan workers and the result aggregator.
pub struct Dispatcher {
    threshold: usize,
    live_scans: Arc<AtomicUsize>,
}

impl Dispatcher {
    /// Create a dispatcher with the given throttle threshold.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            live_scans: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Scan every path and print the table to standard output.
    pub fn run(&self, paths: Vec<String>) -> Result<DispatchSummary> {
        let (summary, _) = self.run_with_writer(paths, io::stdout())?;
        Ok(summary)
    }

    /// Scan every path, writing the table and trailing summary to `out`.
    pub fn run_with_writer<W>(&self, paths: Vec<String>, out: W) -> Result<(DispatchSummary, W)>
    where
        W: Write + Send + 'static,
    {
        let mut phase = Phase::Idle;
        let queue = Arc::new(PendingQueue::new());
        let aggregator = ResultAggregator::new(Arc::clone(&queue), out);
        let printer = thread::spawn(move || aggregator.run());

        enter(&mut phase, Phase::Dispatching);
        let requested = paths.len();
        let wait_group = WaitGroup::new();
        for path in paths {
            // Sampled, not atomic with the spawn: bursts may transiently
            // exceed the threshold.
            if self.live_scans.load(Ordering::Relaxed) >= self.threshold {
                debug!("throttle engaged, scanning {:?} inline", path);
                scan_into(path, &queue);
            } else {
                self.live_scans.fetch_add(1, Ordering::Relaxed);
                let wait_group = wait_group.clone();
                let queue = Arc::clone(&queue);
                let live_scans = Arc::clone(&self.live_scans);
                thread::spawn(move || {
                    scan_into(path, &queue);
                    live_scans.fetch_sub(1, Ordering::Relaxed);
                    drop(wait_group);
                });
            }
        }

        enter(&mut phase, Phase::Draining);
        wait_group.wait();

        enter(&mut phase, Phase::Terminating);
        queue.terminate();
        let (processed, mut out) = printer
            .join()
            .map_err(|_| anyhow!("result aggregator thread panicked"))?;

        enter(&mut phase, Phase::Done);
        writeln!(out, "total files: {}/{}", requested, processed)
            .context("failed to write dispatch summary")?;
        Ok((DispatchSummary { requested, processed }, out))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY_THRESHOLD)
    }
}

fn enter(phase: &mut Phase, next: Phase) {
    debug!("dispatch phase {:?} -> {:?}", *phase, next);
    *phase = next;
}
