use crate::TaskKind;

/// A per-task execution fault.
///
/// Faults are captured on the worker that ran the task and stored in place of
/// a value; they never unwind the worker. [`TaskServer::wait`] surfaces them as
/// [`Error::Task`].
///
/// [`TaskServer::wait`]: crate::TaskServer::wait
/// [`Error::Task`]: crate::Error::Task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum TaskError {
    /// An argument lies outside the operation's domain, e.g. the square root
    /// of a negative number or the sine of infinity.
    #[error("{op}: argument outside the domain of the operation")]
    Domain { op: TaskKind },

    /// Finite arguments produced an infinite result.
    #[error("{op}: result is not representable")]
    Overflow { op: TaskKind },

    /// At least one argument was NaN.
    #[error("{op}: NaN argument")]
    NotANumber { op: TaskKind },
}

impl TaskError {
    /// The kind of task that failed.
    pub const fn op(&self) -> TaskKind {
        match *self {
            Self::Domain { op } | Self::Overflow { op } | Self::NotANumber { op } => op,
        }
    }
}
