mod error;
mod scalar;
mod task;

pub use error::*;
pub use scalar::*;
pub use task::*;
