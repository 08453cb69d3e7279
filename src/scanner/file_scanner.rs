//! Per-file scanning
//!
//! Opens a file, reads it line by line, and builds its tally.

use log::error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use thiserror::Error;

use crate::queue::PendingQueue;
use crate::scanner::classify::classify;
use crate::scanner::tally::FileTally;

/// Errors raised while scanning a single file.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The file could not be opened; it contributes nothing to totals.
    #[error("open file ({path:?}) failed: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    /// A line could not be read; scanning stops at that point.
    #[error("read line from ({path:?}) failed: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

/// Scan one file and produce its tally.
///
/// Every line increments the total, including a final line with no
/// trailing newline. A read error mid-file is logged and ends the scan
/// early; the partial tally is still returned.
pub fn scan(path: &str) -> Result<FileTally, ScanError> {
    let file = File::open(path).map_err(|source| ScanError::Open {
        path: path.to_string(),
        source,
    })?;

    let mut tally = FileTally::new(path);
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => tally.record(classify(&line)),
            Err(source) => {
                error!(
                    "{}",
                    ScanError::Read {
                        path: path.to_string(),
                        source,
                    }
                );
                break;
            }
        }
    }
    Ok(tally)
}

/// Scan one file and deposit exactly one tally, empty on open failure.
///
/// Even an unopenable path deposits, keeping the aggregator's completion
/// count moving.
pub fn scan_into(path: String, queue: &PendingQueue) {
    let tally = match scan(&path) {
        Ok(tally) => tally,
        Err(err) => {
            error!("{}", err);
            FileTally::new(path)
        }
    };
    queue.deposit(vec![tally]);
}
