// Cell extraction: quote stripping and in-place unescaping.
//
// The scanner hands over a raw span of the window. Quoted spans are narrowed
// and their doubled quotes collapsed directly in the window storage, so no
// cell ever needs a heap allocation to be delivered.

use super::dialect::{Dialect, CR, LF};
use memchr::{memchr, memchr3};

/// Resolve the raw span `[start, end)` of `buf` into its logical content.
///
/// Returns the `(start, end)` of the content, which may be shorter than the
/// input span. Only spans whose first byte is `quote` are touched; a bare
/// quote inside an unquoted span is literal data. An unterminated quoted span
/// keeps its last byte.
#[inline]
pub fn unescape_in_place(buf: &mut [u8], start: usize, end: usize, quote: u8) -> (usize, usize) {
    if start >= end || buf[start] != quote {
        return (start, end);
    }
    let start = start + 1;
    (start, unescape_quoted(buf, start, end, quote))
}

/// Content end of a quoted span whose opening quote sits at `start - 1`.
#[inline]
fn unescape_quoted(buf: &mut [u8], start: usize, end: usize, quote: u8) -> usize {
    if start >= end {
        return end;
    }
    if let Some(offset) = memchr(quote, &buf[start..end - 1]) {
        return collapse_doubled_quotes(buf, start + offset, end, quote);
    }
    if buf[end - 1] == quote {
        end - 1
    } else {
        end
    }
}

/// Compact `[first, end)` in place, keeping one quote of every doubled pair
/// and dropping an unpaired one. `first` must hold a quote.
fn collapse_doubled_quotes(buf: &mut [u8], first: usize, end: usize, quote: u8) -> usize {
    let mut write = first;
    let mut escaped = true;
    for read in first + 1..end {
        let byte = buf[read];
        escaped = byte == quote && !escaped;
        if !escaped {
            buf[write] = byte;
            write += 1;
        }
    }
    write
}

/// True if `cell` would be split or altered by the tokenizer unless quoted.
pub fn needs_quoting(cell: &[u8], dialect: Dialect) -> bool {
    memchr3(dialect.separator(), dialect.quote(), LF, cell).is_some() || memchr(CR, cell).is_some()
}

/// Wrap `cell` in quotes, doubling every quote inside it.
pub fn quote_cell(cell: &[u8], quote: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(cell.len() + 2);
    push_quoted(&mut out, cell, quote);
    out
}

fn push_quoted(out: &mut Vec<u8>, cell: &[u8], quote: u8) {
    out.push(quote);
    for &byte in cell {
        if byte == quote {
            out.push(quote);
        }
        out.push(byte);
    }
    out.push(quote);
}

/// Append one `\n`-terminated row to `out`, quoting only cells that need it.
pub fn encode_row<C: AsRef<[u8]>>(out: &mut Vec<u8>, cells: &[C], dialect: Dialect) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(dialect.separator());
        }
        let cell = cell.as_ref();
        if needs_quoting(cell, dialect) {
            push_quoted(out, cell, dialect.quote());
        } else {
            out.extend_from_slice(cell);
        }
    }
    out.push(LF);
}
