//! Client threads that drive a [`TaskServer`] and the report they produce.
//!
//! Each client submits its entire batch before collecting anything, so up to
//! `num_clients * tasks_per_client` identifiers are outstanding at once and
//! the workers see a deep queue.

use crate::config::{LoadConfig, Workload};
use anyhow::anyhow;
use core::f64::consts::{FRAC_PI_6, TAU};
use core::time::Duration;
use ferrotask::{Error, Scalar, ServerConfig, ServerStats, Task, TaskId, TaskKind, TaskServer};
use std::{thread, time::Instant};

/// What one client observed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClientOutcome {
    pub succeeded: usize,
    pub failed: usize,
    /// Timed waits that expired and had to be retried.
    pub timeouts: usize,
    /// Sum of every successfully collected value.
    pub checksum: f64,
}

/// Aggregate result of a load run.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub clients: Vec<ClientOutcome>,
    pub elapsed: Duration,
    pub stats: ServerStats,
}

impl LoadReport {
    pub fn succeeded(&self) -> usize {
        self.clients.iter().map(|c| c.succeeded).sum()
    }

    pub fn failed(&self) -> usize {
        self.clients.iter().map(|c| c.failed).sum()
    }

    pub fn timeouts(&self) -> usize {
        self.clients.iter().map(|c| c.timeouts).sum()
    }

    pub fn checksum(&self) -> f64 {
        self.clients.iter().map(|c| c.checksum).sum()
    }

    /// Collected results per second across all clients.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        (self.succeeded() + self.failed()) as f64 / secs
    }
}

/// Builds the `index`-th task a client submits.
pub fn task_for<T: Scalar>(
    workload: Workload,
    kind: TaskKind,
    index: usize,
    total: usize,
) -> Task<T> {
    if workload == Workload::Mixed {
        return match kind {
            TaskKind::Pow => Task::Pow(T::from_f64(5.0), T::from_f64(2.0)),
            TaskKind::Sin => Task::Sin(T::from_f64(FRAC_PI_6)),
            TaskKind::Sqrt => Task::Sqrt(T::from_f64(25.0)),
        };
    }

    let i = index as f64;
    match kind {
        TaskKind::Sin => Task::Sin(T::from_f64(i * TAU / total as f64)),
        TaskKind::Sqrt => Task::Sqrt(T::from_f64(i)),
        TaskKind::Pow => Task::Pow(T::from_f64(i), T::from_f64(2.0)),
    }
}

/// Starts a server, runs every client to completion and shuts the server
/// down again.
///
/// The server is shut down even when a client fails, so no worker outlives
/// the run.
pub fn run<T: Scalar>(config: &LoadConfig) -> anyhow::Result<LoadReport> {
    let mut server_config = ServerConfig::default();
    if let Some(num_workers) = config.num_workers {
        server_config = server_config.with_num_workers(num_workers);
    }
    let mut server = TaskServer::<T>::with_config(server_config)?;

    let start = Instant::now();
    let outcomes = thread::scope(|s| {
        let handles: Vec<_> = (0..config.num_clients)
            .map(|client| {
                let server = &server;
                s.spawn(move || run_client(server, config, client))
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(client, handle)| {
                handle
                    .join()
                    .map_err(|_| anyhow!("client {client} panicked"))?
            })
            .collect::<anyhow::Result<Vec<_>>>()
    });
    let elapsed = start.elapsed();

    let stats = server.stats();
    server.shutdown()?;

    Ok(LoadReport {
        clients: outcomes?,
        elapsed,
        stats,
    })
}

fn run_client<T: Scalar>(
    server: &TaskServer<T>,
    config: &LoadConfig,
    client: usize,
) -> anyhow::Result<ClientOutcome> {
    let kind = config.kind_for_client(client);

    let ids = (0..config.tasks_per_client)
        .map(|index| {
            let task = task_for(config.workload, kind, index, config.tasks_per_client);
            server.submit(task)
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!("Client {client} submitted {} {kind} tasks", ids.len());

    let mut outcome = ClientOutcome::default();
    for id in ids {
        match collect(server, id, config.wait_timeout, &mut outcome.timeouts) {
            Ok(value) => {
                outcome.succeeded += 1;
                outcome.checksum += value.to_f64();
            }
            Err(Error::Task(e)) => {
                tracing::trace!("Client {client}: {id} failed: {e}");
                outcome.failed += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(outcome)
}

fn collect<T: Scalar>(
    server: &TaskServer<T>,
    id: TaskId,
    timeout: Option<Duration>,
    timeouts: &mut usize,
) -> ferrotask::Result<T> {
    let Some(timeout) = timeout else {
        return server.wait(id);
    };
    match server.wait_timeout(id, timeout) {
        Err(Error::Timeout { .. }) => {
            *timeouts += 1;
            server.wait(id)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LogFormat, Precision};

    fn config(workload: Workload, num_clients: usize, tasks_per_client: usize) -> LoadConfig {
        LoadConfig {
            num_workers: Some(4),
            num_clients,
            tasks_per_client,
            workload,
            precision: Precision::F64,
            wait_timeout: None,
            log_format: LogFormat::Pretty,
        }
    }

    #[test]
    fn mixed_tasks_match_the_historical_inputs() {
        assert_eq!(
            task_for::<f32>(Workload::Mixed, TaskKind::Pow, 7, 100),
            Task::Pow(5.0, 2.0)
        );
        assert_eq!(
            task_for::<f32>(Workload::Mixed, TaskKind::Sqrt, 7, 100),
            Task::Sqrt(25.0)
        );
        assert_eq!(
            task_for::<f64>(Workload::Mixed, TaskKind::Sin, 0, 100),
            Task::Sin(FRAC_PI_6)
        );
    }

    #[test]
    fn mixed_run_collects_every_result() {
        let report = run::<f64>(&config(Workload::Mixed, 3, 500)).unwrap();

        assert_eq!(report.clients.len(), 3);
        assert_eq!(report.succeeded(), 1_500);
        assert_eq!(report.failed(), 0);
        // 500 * (25 + 0.5 + 5)
        assert!((report.checksum() - 15_250.0).abs() < 1e-6);
        assert_eq!(report.stats.submitted, 1_500);
    }

    #[test]
    fn sin_sweep_sums_to_zero() {
        let report = run::<f64>(&config(Workload::Sin, 8, 1_000)).unwrap();
        assert_eq!(report.succeeded(), 8_000);
        assert!(report.checksum().abs() < 1e-6);
    }

    #[test]
    fn timed_waits_still_collect_everything() {
        let mut timed = config(Workload::Pow, 2, 200);
        timed.wait_timeout = Some(Duration::from_millis(1));
        let report = run::<f32>(&timed).unwrap();
        assert_eq!(report.succeeded(), 400);
        assert_eq!(report.stats.failed, 0);
    }
}
