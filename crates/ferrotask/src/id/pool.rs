use crate::{Error, Result, TaskId, sync::Mutex};
use std::collections::BTreeSet;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Issues and recycles [`TaskId`]s.
///
/// Freed identifiers are reused before fresh ones are minted; among freed
/// identifiers the lowest is handed out first. Fresh identifiers increase
/// monotonically from zero and are never issued twice while outstanding.
///
/// All operations take one short critical section on an internal lock, so the
/// pool can be shared freely between client and worker threads.
///
/// # Example
/// ```
/// use ferrotask::IdPool;
///
/// let pool = IdPool::new();
/// let a = pool.allocate();
/// let b = pool.allocate();
/// assert_ne!(a, b);
///
/// pool.free(a).unwrap();
/// assert_eq!(pool.allocate(), a);
/// ```
#[derive(Debug, Default)]
pub struct IdPool {
    state: Mutex<PoolState>,
}

#[derive(Debug, Default)]
struct PoolState {
    /// Next never-issued raw value.
    next: u64,
    /// Previously issued values available for reuse.
    free: BTreeSet<u64>,
}

impl PoolState {
    fn is_outstanding(&self, raw: u64) -> bool {
        raw < self.next && !self.free.contains(&raw)
    }
}

impl IdPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an identifier that is not currently outstanding.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn allocate(&self) -> TaskId {
        let mut state = self.state.lock();
        let raw = match state.free.pop_first() {
            Some(raw) => raw,
            None => {
                let raw = state.next;
                state.next += 1;
                raw
            }
        };
        TaskId::from_raw(raw)
    }

    /// Returns `id` to the reuse set.
    ///
    /// # Errors
    /// Returns [`Error::UnknownId`] if `id` is not outstanding: it was never
    /// issued, or it has already been freed without being reallocated.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn free(&self, id: TaskId) -> Result<()> {
        let mut state = self.state.lock();
        let raw = id.to_raw();
        if !state.is_outstanding(raw) {
            return Err(Error::UnknownId { id });
        }
        state.free.insert(raw);
        Ok(())
    }

    /// Whether `id` has been allocated and not yet freed.
    pub fn is_outstanding(&self, id: TaskId) -> bool {
        self.state.lock().is_outstanding(id.to_raw())
    }

    /// Number of identifiers currently outstanding.
    pub fn outstanding(&self) -> usize {
        let state = self.state.lock();
        // `free` only ever holds values below `next`.
        (state.next - state.free.len() as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::thread::scope;

    #[test]
    fn fresh_ids_are_monotonic() {
        let pool = IdPool::new();
        let ids: Vec<u64> = (0..5).map(|_| pool.allocate().to_raw()).collect();
        assert_eq!(ids, [0, 1, 2, 3, 4]);
        assert_eq!(pool.outstanding(), 5);
    }

    #[test]
    fn freed_ids_are_reused_before_fresh_ones() {
        let pool = IdPool::new();
        let a = pool.allocate();
        let b = pool.allocate();
        let c = pool.allocate();

        pool.free(c).unwrap();
        pool.free(a).unwrap();
        assert_eq!(pool.outstanding(), 1);

        assert_eq!(pool.allocate(), a);
        assert_eq!(pool.allocate(), c);
        assert_eq!(pool.allocate(), TaskId::from_raw(3));
        assert!(pool.is_outstanding(b));
    }

    #[test]
    fn double_free_is_rejected() {
        let pool = IdPool::new();
        let id = pool.allocate();
        pool.free(id).unwrap();
        assert!(matches!(pool.free(id), Err(Error::UnknownId { id: got }) if got == id));
        assert!(!pool.is_outstanding(id));
    }

    #[test]
    fn never_issued_id_is_rejected() {
        let pool = IdPool::new();
        let id = TaskId::from_raw(7);
        assert!(matches!(pool.free(id), Err(Error::UnknownId { .. })));
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn concurrent_allocations_are_unique() {
        const THREADS: usize = 8;
        const IDS_PER_THREAD: usize = 2048;

        let pool = IdPool::new();
        let seen = Arc::new(Mutex::new(HashSet::with_capacity(THREADS * IDS_PER_THREAD)));

        scope(|s| {
            for _ in 0..THREADS {
                let pool = &pool;
                let seen = Arc::clone(&seen);
                s.spawn(move || {
                    for i in 0..IDS_PER_THREAD {
                        let id = pool.allocate();
                        assert!(seen.lock().unwrap().insert(id));
                        // Recycle half of them so reuse races with allocation.
                        if i % 2 == 0 {
                            seen.lock().unwrap().remove(&id);
                            pool.free(id).unwrap();
                        }
                    }
                });
            }
        });

        assert_eq!(pool.outstanding(), THREADS * IDS_PER_THREAD / 2);
        assert_eq!(seen.lock().unwrap().len(), THREADS * IDS_PER_THREAD / 2);
    }
}
