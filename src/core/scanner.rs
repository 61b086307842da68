// Consumption engine: the byte-classifying state machine.
//
// Two scan modes share one transition table:
// - consume_all drains every available byte (flush / end of stream)
// - consume_to_next_row stops right after one row terminator
//
// Both persist ScanState on return, so scanning can stop at any buffer
// boundary and resume after a refill, even between the CR and LF of a CRLF
// pair or between the two quotes of a doubled quote.

use super::consumer::CellConsumer;
use super::dialect::{Dialect, CR, LF};
use super::field::unescape_in_place;
use super::window::CharWindow;

/// Scanner state carried across calls and refills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    /// An odd number of quotes has been seen since the last cell boundary.
    pub quoted: bool,
    /// The previous byte was an unquoted CR that already ended a row.
    pub after_cr: bool,
}

#[derive(Debug, Clone)]
pub struct Scanner {
    dialect: Dialect,
    state: ScanState,
}

impl Scanner {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_state(dialect, ScanState::default())
    }

    /// Resume from a state captured with `state()`.
    pub fn with_state(dialect: Dialect, state: ScanState) -> Self {
        Scanner { dialect, state }
    }

    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[inline]
    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = ScanState::default();
    }

    /// Scan every unscanned byte of `window`, emitting all cells and row
    /// ends found. Bytes after the last boundary stay pending in the window.
    pub fn consume_all<C: CellConsumer>(&mut self, window: &mut CharWindow, consumer: &mut C) {
        check_cursors(window);
        let separator = self.dialect.separator();
        let quote = self.dialect.quote();
        let len = window.len;
        let mut state = self.state;
        let mut i = window.cursor;

        while i < len {
            let byte = window.buffer[i];
            if byte == quote {
                state.quoted = !state.quoted;
            } else if state.quoted {
                state.after_cr = false;
            } else if byte == separator {
                self.new_cell(window, i, consumer);
                state.after_cr = false;
            } else if byte == LF {
                if state.after_cr {
                    // second half of a CRLF, the row already ended at the CR
                    window.mark = i + 1;
                    state.after_cr = false;
                } else {
                    self.end_of_row(window, i, consumer);
                }
            } else if byte == CR {
                self.end_of_row(window, i, consumer);
                state.after_cr = true;
            } else {
                state.after_cr = false;
            }
            i += 1;
        }

        window.cursor = i;
        self.state = state;
    }

    /// Scan until one row terminator has been consumed.
    ///
    /// Returns `true` with the cursor at the start of the next row, or
    /// `false` once the window is exhausted without completing a row.
    pub fn consume_to_next_row<C: CellConsumer>(
        &mut self,
        window: &mut CharWindow,
        consumer: &mut C,
    ) -> bool {
        check_cursors(window);
        let separator = self.dialect.separator();
        let quote = self.dialect.quote();
        let len = window.len;
        let mut state = self.state;
        let mut i = window.cursor;

        while i < len {
            let byte = window.buffer[i];
            if byte == quote {
                state.quoted = !state.quoted;
            } else if state.quoted {
                state.after_cr = false;
            } else if byte == separator {
                self.new_cell(window, i, consumer);
                state.after_cr = false;
            } else if byte == LF && state.after_cr {
                window.mark = i + 1;
                state.after_cr = false;
            } else if byte == LF || byte == CR {
                self.end_of_row(window, i, consumer);
                window.cursor = i + 1;
                self.state = ScanState {
                    quoted: false,
                    after_cr: byte == CR,
                };
                return true;
            } else {
                state.after_cr = false;
            }
            i += 1;
        }

        window.cursor = i;
        self.state = state;
        false
    }

    /// Emit `[mark, len)` as a final cell if it is non-empty.
    ///
    /// Only meaningful once the source is exhausted and the window has been
    /// drained; returns whether a cell was emitted.
    pub fn emit_trailing<C: CellConsumer>(
        &mut self,
        window: &mut CharWindow,
        consumer: &mut C,
    ) -> bool {
        debug_assert!(
            !window.has_unscanned(),
            "emit_trailing called before the window was drained"
        );
        if window.mark >= window.len {
            return false;
        }
        let len = window.len;
        self.emit_cell(window, len, consumer);
        window.mark = len;
        true
    }

    #[inline]
    fn new_cell<C: CellConsumer>(&self, window: &mut CharWindow, end: usize, consumer: &mut C) {
        self.emit_cell(window, end, consumer);
        window.mark = end + 1;
    }

    #[inline]
    fn end_of_row<C: CellConsumer>(&self, window: &mut CharWindow, end: usize, consumer: &mut C) {
        self.new_cell(window, end, consumer);
        consumer.on_row_end();
    }

    #[inline]
    fn emit_cell<C: CellConsumer>(&self, window: &mut CharWindow, end: usize, consumer: &mut C) {
        let (start, stop) =
            unescape_in_place(&mut window.buffer, window.mark, end, self.dialect.quote());
        consumer.on_cell(&window.buffer[start..stop]);
    }
}

#[inline]
fn check_cursors(window: &CharWindow) {
    assert!(
        window.mark <= window.cursor && window.cursor <= window.len,
        "corrupted window cursors (mark {}, cursor {}, len {})",
        window.mark,
        window.cursor,
        window.len
    );
}
