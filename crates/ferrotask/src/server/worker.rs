use super::shared::Shared;
use crate::{PendingEntry, Scalar};

/// Body of each worker thread.
///
/// Pops entries until the queue is closed *and* empty, so a stopping server
/// still executes everything that was queued before the stop. Each task runs
/// synchronously with no lock held; the queue lock is released before
/// evaluation and the table lock is only taken to publish.
pub(crate) fn worker_loop<T: Scalar>(_worker_id: usize, shared: &Shared<T>) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker_id} started");

    while let Some(PendingEntry { task, id }) = shared.queue.pop() {
        let result = task.evaluate();

        #[cfg(feature = "tracing")]
        match &result {
            Ok(_) => tracing::trace!("Worker {_worker_id} finished {task} as {id}"),
            Err(e) => tracing::debug!("Worker {_worker_id} failed {task} as {id}: {e}"),
        }

        shared.counters.record_executed(result.is_ok());
        shared.results.publish(id, result);
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker_id} stopped");
}
