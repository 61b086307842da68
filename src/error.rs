// Error type for dialect construction and refill failures.
//
// Malformed quoting is never an error: the tokenizer passes it through as
// literal cell content.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Separator and quote were configured to the same byte.
    #[error("separator and quote must differ (both are {0:#04x})")]
    SeparatorIsQuote(u8),

    /// A dialect byte collides with a row terminator.
    #[error("{role} cannot be a line terminator byte ({byte:#04x})")]
    LineTerminator { role: &'static str, byte: u8 },

    /// The refill source failed while reading.
    #[error("refill source failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
