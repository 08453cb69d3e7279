//! Tally table layout
//!
//! Fixed-width rows shared by the header, the per-file lines, and the
//! closing summary.

use crate::scanner::tally::{AggregateTotals, FileTally};

const NAME_WIDTH: usize = 80;
const COUNT_WIDTH: usize = 10;

/// Label of the summary row
const TOTAL_LABEL: &str = "In total";

/// Fixed-width layout for tally output.
#[derive(Debug, Clone, Copy)]
pub struct TallyTable {
    name_width: usize,
    count_width: usize,
}

impl TallyTable {
    pub fn new() -> Self {
        Self {
            name_width: NAME_WIDTH,
            count_width: COUNT_WIDTH,
        }
    }

    /// Column header row.
    pub fn header(&self) -> String {
        self.format_row("filename", "regular", "blank/space", "comment", "total")
    }

    /// One row for a single file's counts.
    pub fn row(&self, tally: &FileTally) -> String {
        self.format_row(
            &tally.filename,
            &tally.regular.to_string(),
            &tally.blank.to_string(),
            &tally.comment.to_string(),
            &tally.total.to_string(),
        )
    }

    /// The closing summary row.
    pub fn summary(&self, totals: &AggregateTotals) -> String {
        self.format_row(
            TOTAL_LABEL,
            &totals.regular.to_string(),
            &totals.blank.to_string(),
            &totals.comment.to_string(),
            &totals.total.to_string(),
        )
    }

    fn format_row(
        &self,
        name: &str,
        regular: &str,
        blank: &str,
        comment: &str,
        total: &str,
    ) -> String {
        format!(
            "{:<name_width$} {:>count_width$} {:>count_width$} {:>count_width$} {:>count_width$}",
            name,
            regular,
            blank,
            comment,
            total,
            name_width = self.name_width,
            count_width = self.count_width,
        )
    }
}

impl Default for TallyTable {
    fn default() -> Self {
        Self::new()
    }
}
