//! Error types for the task server.
//!
//! Configuration and protocol misuse are reported synchronously to the caller
//! that made the mistake and never disturb other callers. Faults raised while
//! *executing* a task are a separate concern: they are captured per task as
//! a [`TaskError`] and only surface through [`Error::Task`] when the result is
//! collected.

use crate::{ServerState, TaskError, TaskId};
use core::time::Duration;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors `ferrotask` can produce.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A server was configured with zero workers.
    #[error("worker count must be greater than 0")]
    InvalidWorkerCount,

    /// `start` was called on a server that has already left `Created`.
    #[error("server cannot be started from the {state} state")]
    AlreadyStarted { state: ServerState },

    /// A task was submitted before `start` or after `shutdown`.
    #[error("server is not accepting tasks in the {state} state")]
    NotRunning { state: ServerState },

    /// The identifier is not outstanding: it was never issued, or its result
    /// has already been collected.
    #[error("task {id} is not outstanding")]
    UnknownId { id: TaskId },

    /// A timed wait expired. The result, once ready, is still collectable.
    #[error("task {id} not ready after {timeout:?}")]
    Timeout { id: TaskId, timeout: Duration },

    /// `shutdown` was invoked from one of the server's own worker threads.
    #[error("shutdown cannot be called from a worker thread")]
    CalledFromWorker,

    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker thread")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    /// One or more workers panicked before they could be joined.
    #[error("{panicked} worker thread(s) panicked")]
    WorkerPanicked { panicked: usize },

    /// The task ran but failed.
    #[error("task failed: {0}")]
    Task(#[from] TaskError),
}
