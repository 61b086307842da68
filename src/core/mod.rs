// Core primitives: window, scanner, cell extraction, consumer contract

pub mod consumer;
pub mod dialect;
pub mod field;
pub mod scanner;
pub mod window;

pub use consumer::{CellConsumer, CellCounter, RowCollector};
pub use dialect::Dialect;
pub use field::{encode_row, needs_quoting, quote_cell, unescape_in_place};
pub use scanner::{ScanState, Scanner};
pub use window::{CharWindow, Fill, ReadSource, RefillSource, DEFAULT_CAPACITY};
