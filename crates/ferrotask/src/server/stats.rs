use portable_atomic::{AtomicU64, Ordering};

/// A point-in-time snapshot of a server's activity.
///
/// Counters are cumulative since the server was created. Gauges (`pending`,
/// `ready`, `outstanding`) are sampled one after another without a global
/// lock, so under load they may not add up exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServerStats {
    /// Tasks accepted by `submit`.
    pub submitted: u64,
    /// Tasks that ran and produced a value.
    pub completed: u64,
    /// Tasks that ran and produced a fault.
    pub failed: u64,
    /// Tasks queued and not yet picked up by a worker.
    pub pending: usize,
    /// Results published and not yet collected.
    pub ready: usize,
    /// Identifiers issued and not yet recycled.
    pub outstanding: usize,
}

impl ServerStats {
    /// Tasks a worker has finished, successfully or not.
    pub const fn executed(&self) -> u64 {
        self.completed + self.failed
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl Counters {
    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_executed(&self, ok: bool) {
        let counter = if ok { &self.completed } else { &self.failed };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> (u64, u64, u64) {
        (
            self.submitted.load(Ordering::Relaxed),
            self.completed.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}
