mod config;
mod shared;
mod state;
mod stats;
mod task_server;
mod worker;

pub use config::*;
pub use state::*;
pub use stats::*;
pub use task_server::*;
