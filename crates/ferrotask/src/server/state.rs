use core::fmt;

/// Lifecycle of a [`TaskServer`].
///
/// ```text
/// Created ──start──▶ Running ──shutdown──▶ Stopping ──(workers joined)──▶ Stopped
/// ```
///
/// [`TaskServer`]: crate::TaskServer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServerState {
    /// No workers exist yet.
    Created,
    /// Workers are live and submissions are accepted.
    Running,
    /// Submissions are refused; workers are draining the queue and exiting.
    Stopping,
    /// Terminal. Every worker has been joined.
    Stopped,
}

impl ServerState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
