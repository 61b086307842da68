// Separator/quote configuration, fixed per tokenizer instance.

use crate::error::{Error, Result};

pub const LF: u8 = b'\n';
pub const CR: u8 = b'\r';

/// The two structural bytes of a CSV dialect.
///
/// Row terminators are always `\n`, `\r` or `\r\n` and are not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    separator: u8,
    quote: u8,
}

impl Dialect {
    /// Build a dialect, rejecting byte combinations the scanner cannot
    /// tell apart.
    pub fn new(separator: u8, quote: u8) -> Result<Self> {
        if separator == quote {
            return Err(Error::SeparatorIsQuote(separator));
        }
        for (role, byte) in [("separator", separator), ("quote", quote)] {
            if byte == LF || byte == CR {
                return Err(Error::LineTerminator { role, byte });
            }
        }
        Ok(Dialect { separator, quote })
    }

    #[inline]
    pub fn separator(&self) -> u8 {
        self.separator
    }

    #[inline]
    pub fn quote(&self) -> u8 {
        self.quote
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect {
            separator: b',',
            quote: b'"',
        }
    }
}
