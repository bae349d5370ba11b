#![doc = include_str!("../README.md")]

mod error;
mod id;
mod queue;
mod server;
mod sync;
mod table;
mod task;

pub use crate::error::*;
pub use crate::id::*;
pub use crate::queue::*;
pub use crate::server::*;
pub use crate::table::*;
pub use crate::task::*;
