//! Shared tally queue
//!
//! Connects scan producers to the single result aggregator. The queue is a
//! single-slot merge buffer: producers never block beyond a brief lock and
//! never overwrite each other, and exactly one consumer drains it.

pub mod pending;

pub use pending::{Drained, PendingQueue};
