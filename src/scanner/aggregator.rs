//! Result aggregation
//!
//! The single consumer of the pending queue. Owns the running totals,
//! prints one row per drained tally, and finishes with the summary row.

use log::{debug, error};
use std::io::Write;
use std::sync::Arc;

use crate::display::table::TallyTable;
use crate::queue::{Drained, PendingQueue};
use crate::scanner::tally::{AggregateTotals, FileTally};

/// Single-consumer task folding per-file tallies into running totals.
pub struct ResultAggregator<W: Write> {
    queue: Arc<PendingQueue>,
    totals: AggregateTotals,
    table: TallyTable,
    out: W,
}

impl<W: Write> ResultAggregator<W> {
    /// Create an aggregator draining `queue` and writing the table to `out`.
    pub fn new(queue: Arc<PendingQueue>, out: W) -> Self {
        Self {
            queue,
            totals: AggregateTotals::new(),
            table: TallyTable::new(),
            out,
        }
    }

    /// Consume batches until termination.
    ///
    /// Rows are printed strictly in drain order. Returns the number of
    /// tallies consumed, together with the writer.
    pub fn run(mut self) -> (usize, W) {
        let header = self.table.header();
        self.write_line(&header);

        loop {
            match self.queue.wait_next() {
                Drained::Batch(batch) => self.consume(batch),
                Drained::Terminated => break,
            }
        }
        // One best-effort sweep for a batch deposited alongside termination.
        if let Some(batch) = self.queue.try_drain() {
            self.consume(batch);
        }

        let summary = self.table.summary(&self.totals);
        self.write_line(&summary);
        debug!("aggregated {} files", self.totals.files);
        (self.totals.files, self.out)
    }

    fn consume(&mut self, batch: Vec<FileTally>) {
        for tally in batch {
            let row = self.table.row(&tally);
            self.write_line(&row);
            self.totals.fold(&tally);
        }
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            error!("write output failed: {}", e);
        }
    }
}
