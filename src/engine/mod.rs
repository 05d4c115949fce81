mod batch_engine;
mod operation;

pub use batch_engine::{BatchEngine, BatchReport};
pub use operation::{Operation, OperationType};
