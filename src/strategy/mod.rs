// Tokenization drivers built on the core scanner

pub mod direct;
pub mod parallel;
pub mod reader;
pub mod streaming;

pub use direct::*;
pub use parallel::*;
pub use reader::{CellReader, RowStatus};
pub use streaming::*;
