// `parking_lot` locks do not poison, so none of the synchronized containers
// need a lock-poisoned error path.
pub(crate) use parking_lot::{Condvar, Mutex, MutexGuard};
