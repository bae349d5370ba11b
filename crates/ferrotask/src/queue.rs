//! Multi-producer/multi-consumer FIFO of tasks awaiting a worker.
//!
//! [`PendingQueue`] pairs a `VecDeque` with a condition variable. The queue's
//! lock guards both the entries and the `closed` flag, so a worker checks
//! "entry available or queue closed" under the same lock a producer or
//! [`PendingQueue::close`] takes to change it. A notification can therefore
//! never slip in between a worker's check and its wait.

use crate::{
    Scalar, Task, TaskId,
    sync::{Condvar, Mutex},
};
use std::collections::VecDeque;

/// A task together with the identifier its result will be published under.
///
/// Owned by the [`PendingQueue`] from [`push`](PendingQueue::push) until a
/// worker pops it; from then on the popping worker owns it exclusively.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingEntry<T: Scalar> {
    pub task: Task<T>,
    pub id: TaskId,
}

/// An unbounded, thread-safe FIFO queue of [`PendingEntry`]s.
///
/// Entries pushed by a single producer are popped in the order they were
/// pushed. Every entry is handed to exactly one consumer.
///
/// Once [closed](Self::close) the queue refuses new entries but keeps handing
/// out the ones it still holds; [`pop`](Self::pop) returns `None` only when
/// the queue is both closed and empty. This is what lets a stopping server
/// drain its backlog.
#[derive(Debug)]
pub struct PendingQueue<T: Scalar> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

#[derive(Debug)]
struct QueueState<T: Scalar> {
    entries: VecDeque<PendingEntry<T>>,
    closed: bool,
}

impl<T: Scalar> Default for PendingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> PendingQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                entries: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Appends `entry` and wakes one blocked consumer.
    ///
    /// Never blocks beyond the internal critical section.
    ///
    /// # Errors
    /// Hands `entry` back unchanged if the queue has been closed.
    pub fn push(&self, entry: PendingEntry<T>) -> Result<(), PendingEntry<T>> {
        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(entry);
            }
            state.entries.push_back(entry);
        }
        self.available.notify_one();
        Ok(())
    }

    /// Removes the oldest entry without blocking.
    pub fn try_pop(&self) -> Option<PendingEntry<T>> {
        self.state.lock().entries.pop_front()
    }

    /// Removes the oldest entry, blocking while the queue is empty and open.
    ///
    /// Returns `None` once the queue is closed and fully drained. Wakeups are
    /// never trusted: state is re-checked after every return from the wait.
    pub fn pop(&self) -> Option<PendingEntry<T>> {
        let mut state = self.state.lock();
        loop {
            if let Some(entry) = state.entries.pop_front() {
                return Some(entry);
            }
            if state.closed {
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    /// Refuses further pushes and wakes every blocked consumer.
    ///
    /// Returns `false` if the queue was already closed.
    pub fn close(&self) -> bool {
        let newly_closed = {
            let mut state = self.state.lock();
            !core::mem::replace(&mut state.closed, true)
        };
        self.available.notify_all();
        newly_closed
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}
