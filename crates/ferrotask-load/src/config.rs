use anyhow::bail;
use clap::{Parser, ValueEnum};
use core::time::Duration;
use ferrotask::TaskKind;

/// Which tasks each client submits.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    /// `sin(x)` with `x` swept over one full period.
    Sin,
    /// `sqrt(x)` over increasing `x`.
    Sqrt,
    /// `pow(x, 2)` over increasing `x`.
    Pow,
    /// One fixed task kind per client, in rotation.
    Mixed,
}

/// Numeric type the server computes with.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    F32,
    F64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Runtime configuration for the `ferrotask-load` binary.
///
/// All values are parsed from CLI arguments or environment variables.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ferrotask-load",
    version,
    about = "Drive a ferrotask server with concurrent clients"
)]
pub struct CliArgs {
    /// Number of worker threads in the server pool.
    ///
    /// Defaults to the number of logical CPUs.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS")]
    pub num_workers: Option<usize>,

    /// Number of client threads submitting and collecting tasks.
    ///
    /// Environment variable: `NUM_CLIENTS`
    #[arg(long, env = "NUM_CLIENTS", default_value_t = 3)]
    pub num_clients: usize,

    /// Number of tasks each client submits before collecting any result.
    ///
    /// Environment variable: `TASKS_PER_CLIENT`
    #[arg(long, env = "TASKS_PER_CLIENT", default_value_t = 10_000)]
    pub tasks_per_client: usize,

    /// Task mix submitted by the clients.
    ///
    /// Environment variable: `WORKLOAD`
    #[arg(long, env = "WORKLOAD", value_enum, default_value_t = Workload::Mixed)]
    pub workload: Workload,

    /// Floating-point precision of the server.
    ///
    /// Environment variable: `PRECISION`
    #[arg(long, env = "PRECISION", value_enum, default_value_t = Precision::F32)]
    pub precision: Precision,

    /// Collect results with a timed wait of this many milliseconds, retrying
    /// with a blocking wait when it expires. Unset means block immediately.
    ///
    /// Environment variable: `WAIT_TIMEOUT_MS`
    #[arg(long, env = "WAIT_TIMEOUT_MS")]
    pub wait_timeout_ms: Option<u64>,

    /// Log output format.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct LoadConfig {
    pub num_workers: Option<usize>,
    pub num_clients: usize,
    pub tasks_per_client: usize,
    pub workload: Workload,
    pub precision: Precision,
    pub wait_timeout: Option<Duration>,
    pub log_format: LogFormat,
}

impl LoadConfig {
    pub const fn total_tasks(&self) -> usize {
        self.num_clients * self.tasks_per_client
    }

    /// The task kind a given client submits.
    pub const fn kind_for_client(&self, client: usize) -> TaskKind {
        match self.workload {
            Workload::Sin => TaskKind::Sin,
            Workload::Sqrt => TaskKind::Sqrt,
            Workload::Pow => TaskKind::Pow,
            Workload::Mixed => {
                // Matches the historical harness: pow, sin, sqrt.
                const ROTATION: [TaskKind; 3] = [TaskKind::Pow, TaskKind::Sin, TaskKind::Sqrt];
                ROTATION[client % ROTATION.len()]
            }
        }
    }
}

impl TryFrom<CliArgs> for LoadConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.num_workers == Some(0) {
            bail!("NUM_WORKERS must be greater than 0");
        }

        if args.num_clients == 0 {
            bail!("NUM_CLIENTS must be greater than 0");
        }

        if args.tasks_per_client == 0 {
            bail!("TASKS_PER_CLIENT must be greater than 0");
        }

        if args
            .num_clients
            .checked_mul(args.tasks_per_client)
            .is_none()
        {
            bail!(
                "NUM_CLIENTS ({}) x TASKS_PER_CLIENT ({}) overflows",
                args.num_clients,
                args.tasks_per_client
            );
        }

        Ok(Self {
            num_workers: args.num_workers,
            num_clients: args.num_clients,
            tasks_per_client: args.tasks_per_client,
            workload: args.workload,
            precision: args.precision,
            wait_timeout: args.wait_timeout_ms.map(Duration::from_millis),
            log_format: args.log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<LoadConfig> {
        let argv = core::iter::once("ferrotask-load").chain(args.iter().copied());
        let args = CliArgs::try_parse_from(argv)?;
        LoadConfig::try_from(args)
    }

    #[test]
    fn cli_shape_is_valid() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }

    #[test]
    fn explicit_flags_are_applied() {
        let config = parse(&[
            "--num-workers",
            "16",
            "--num-clients",
            "8",
            "--tasks-per-client",
            "1000",
            "--workload",
            "sin",
            "--precision",
            "f64",
            "--wait-timeout-ms",
            "250",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(config.num_workers, Some(16));
        assert_eq!(config.total_tasks(), 8_000);
        assert_eq!(config.workload, Workload::Sin);
        assert_eq!(config.precision, Precision::F64);
        assert_eq!(config.wait_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.kind_for_client(5), TaskKind::Sin);
    }

    #[test]
    fn zero_counts_are_rejected() {
        assert!(parse(&["--num-workers", "0"]).is_err());
        assert!(parse(&["--num-clients", "0"]).is_err());
        assert!(parse(&["--tasks-per-client", "0"]).is_err());
    }

    #[test]
    fn mixed_workload_rotates_kinds() {
        let config = parse(&["--workload", "mixed"]).unwrap();
        let kinds: Vec<_> = (0..4).map(|c| config.kind_for_client(c)).collect();
        assert_eq!(
            kinds,
            [TaskKind::Pow, TaskKind::Sin, TaskKind::Sqrt, TaskKind::Pow]
        );
    }
}
