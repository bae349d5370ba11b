/// Worker pool settings for a [`TaskServer`].
///
/// [`TaskServer`]: crate::TaskServer
///
/// # Example
/// ```
/// use ferrotask::ServerConfig;
///
/// let config = ServerConfig::default()
///     .with_num_workers(4)
///     .with_thread_name("solver");
/// assert_eq!(config.num_workers, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Number of worker threads. Must be greater than zero.
    pub num_workers: usize,
    /// Prefix for worker thread names; workers are named `{prefix}-{index}`.
    pub thread_name: String,
    /// Stack size for worker threads. `None` uses the platform default.
    pub stack_size: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            thread_name: String::from("ferrotask-worker"),
            stack_size: None,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    #[must_use]
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    #[must_use]
    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = Some(stack_size);
        self
    }
}
