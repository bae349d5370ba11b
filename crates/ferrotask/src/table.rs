//! Completed results, keyed by [`TaskId`].

use crate::{
    Scalar, TaskError, TaskId,
    sync::{Condvar, Mutex, MutexGuard},
};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// The outcome of executing one task: a value or a captured fault.
pub type TaskResult<T> = core::result::Result<T, TaskError>;

/// A thread-safe mapping from [`TaskId`] to [`TaskResult`].
///
/// Workers [`publish`](Self::publish) into the table and clients take results
/// out of it, either immediately with [`take`](Self::take) or by blocking in
/// [`wait_take`](Self::wait_take). Insertion and removal happen under the same
/// lock the waiters check their predicate with, so a result is either fully
/// visible or not visible at all, and a publish cannot be missed by a waiter
/// that is about to block.
///
/// All waiters share one condition variable; a publish wakes every one of
/// them and each re-checks its own identifier.
#[derive(Debug)]
pub struct ResultTable<T: Scalar> {
    entries: Mutex<HashMap<TaskId, TaskResult<T>>>,
    ready: Condvar,
}

impl<T: Scalar> Default for ResultTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> ResultTable<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ready: Condvar::new(),
        }
    }

    /// Stores the result for `id` and wakes all waiters.
    ///
    /// Each identifier is published at most once while outstanding; a second
    /// publish for the same id would overwrite the first and is a logic error.
    pub fn publish(&self, id: TaskId, result: TaskResult<T>) {
        {
            let mut entries = self.entries.lock();
            let previous = entries.insert(id, result);
            debug_assert!(previous.is_none(), "result for {id} published twice");
        }
        self.ready.notify_all();
    }

    /// Removes and returns the result for `id` if it is present.
    pub fn take(&self, id: TaskId) -> Option<TaskResult<T>> {
        self.entries.lock().remove(&id)
    }

    /// Blocks until a result for `id` is present, then removes and returns it.
    pub fn wait_take(&self, id: TaskId) -> TaskResult<T> {
        self.wait_locked(self.entries.lock(), id)
    }

    /// Like [`wait_take`](Self::wait_take), but gives up after `timeout`.
    ///
    /// On timeout returns `None` and leaves the table untouched, so a result
    /// that arrives later is still available to another call.
    pub fn wait_take_timeout(&self, id: TaskId, timeout: Duration) -> Option<TaskResult<T>> {
        let mut entries = self.entries.lock();
        // A deadline past the end of representable time means "no deadline".
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Some(self.wait_locked(entries, id));
        };
        loop {
            if let Some(result) = entries.remove(&id) {
                return Some(result);
            }
            if self.ready.wait_until(&mut entries, deadline).timed_out() {
                // One final check: the result may have landed right at the
                // deadline.
                return entries.remove(&id);
            }
        }
    }

    fn wait_locked(
        &self,
        mut entries: MutexGuard<'_, HashMap<TaskId, TaskResult<T>>>,
        id: TaskId,
    ) -> TaskResult<T> {
        loop {
            if let Some(result) = entries.remove(&id) {
                return result;
            }
            self.ready.wait(&mut entries);
        }
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.entries.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
