mod pool;
mod task_id;

pub use pool::*;
pub use task_id::*;
