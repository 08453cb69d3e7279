//! Pending tally buffer
//!
//! A deposit that finds the slot occupied merges its batch onto the
//! occupant rather than overwriting or waiting for the consumer, so no
//! tally is ever lost and producers only ever hold the lock briefly.

use parking_lot::{Condvar, Mutex};

use crate::scanner::tally::FileTally;

/// Outcome of one wait on the queue.
#[derive(Debug, PartialEq, Eq)]
pub enum Drained {
    /// One merged batch of tallies
    Batch(Vec<FileTally>),
    /// Termination was requested and the slot is empty
    Terminated,
}

#[derive(Debug, Default)]
struct Slot {
    batch: Option<Vec<FileTally>>,
    terminated: bool,
}

/// Multi-producer, single-consumer tally buffer.
pub struct PendingQueue {
    slot: Mutex<Slot>,
    ready: Condvar,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::default()),
            ready: Condvar::new(),
        }
    }

    /// Deposit a batch, merging onto any batch already waiting.
    pub fn deposit(&self, tallies: Vec<FileTally>) {
        let mut slot = self.slot.lock();
        match slot.batch.as_mut() {
            Some(pending) => pending.extend(tallies),
            None => slot.batch = Some(tallies),
        }
        self.ready.notify_one();
    }

    /// Request termination once all producers are done depositing.
    pub fn terminate(&self) {
        let mut slot = self.slot.lock();
        slot.terminated = true;
        self.ready.notify_one();
    }

    /// Block until a batch arrives or termination is requested.
    ///
    /// A waiting batch always wins over a pending termination request.
    pub fn wait_next(&self) -> Drained {
        let mut slot = self.slot.lock();
        loop {
            if let Some(batch) = slot.batch.take() {
                return Drained::Batch(batch);
            }
            if slot.terminated {
                return Drained::Terminated;
            }
            self.ready.wait(&mut slot);
        }
    }

    /// Take whatever is waiting without blocking.
    pub fn try_drain(&self) -> Option<Vec<FileTally>> {
        self.slot.lock().batch.take()
    }
}

impl Default for PendingQueue {
    fn default() -> Self {
        Self::new()
    }
}
