use super::stats::Counters;
use crate::{IdPool, PendingQueue, ResultTable, Scalar};

/// State shared between a [`TaskServer`] handle and its workers.
///
/// Each component carries its own lock; nothing here spans more than one of
/// them.
///
/// [`TaskServer`]: crate::TaskServer
#[derive(Debug)]
pub(crate) struct Shared<T: Scalar> {
    pub(crate) ids: IdPool,
    pub(crate) queue: PendingQueue<T>,
    pub(crate) results: ResultTable<T>,
    pub(crate) counters: Counters,
}

impl<T: Scalar> Shared<T> {
    pub(crate) fn new() -> Self {
        Self {
            ids: IdPool::new(),
            queue: PendingQueue::new(),
            results: ResultTable::new(),
            counters: Counters::default(),
        }
    }
}
