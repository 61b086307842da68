// Pull driver: a RefillSource feeding a window, scanned row by row.
//
// This layer owns the end-of-stream policy the scanner leaves open:
// - drain whatever is still unscanned
// - emit [mark, len) as a final cell if non-empty
// - close the row if any cell was emitted since the last row end
// - call on_end once

use crate::core::{CellConsumer, CharWindow, Dialect, Fill, RefillSource, ScanState, Scanner};
use crate::error::Result;
use log::{debug, trace};

/// Progress reported by `CellReader::next_row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    /// One row (cells plus row end) was delivered.
    Row,
    /// The source has nothing right now; call again later.
    Pending,
    /// The stream is over; nothing was delivered.
    End,
}

pub struct CellReader<S> {
    source: S,
    window: CharWindow,
    scanner: Scanner,
    row_open: bool,
    exhausted: bool,
    finished: bool,
}

impl<S: RefillSource> CellReader<S> {
    pub fn new(source: S) -> Self {
        Self::with_dialect(source, Dialect::default())
    }

    pub fn with_dialect(source: S, dialect: Dialect) -> Self {
        Self::with_capacity(source, dialect, crate::core::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(source: S, dialect: Dialect, capacity: usize) -> Self {
        CellReader {
            source,
            window: CharWindow::with_capacity(capacity),
            scanner: Scanner::new(dialect),
            row_open: false,
            exhausted: false,
            finished: false,
        }
    }

    /// Deliver the next row to `consumer`, refilling as needed.
    pub fn next_row<C: CellConsumer>(&mut self, consumer: &mut C) -> Result<RowStatus> {
        if self.finished {
            return Ok(RowStatus::End);
        }
        loop {
            let mut tracked = RowTracker::new(&mut *consumer, &mut self.row_open);
            if self
                .scanner
                .consume_to_next_row(&mut self.window, &mut tracked)
            {
                return Ok(RowStatus::Row);
            }
            if self.exhausted {
                self.finished = true;
                let closed = finish_stream(
                    &mut self.scanner,
                    &mut self.window,
                    consumer,
                    &mut self.row_open,
                );
                return Ok(if closed { RowStatus::Row } else { RowStatus::End });
            }
            match self.window.refill(&mut self.source)? {
                Fill::Exhausted => self.exhausted = true,
                Fill::Filled(0) | Fill::Pending => {
                    trace!("source pending at {} buffered bytes", self.window.len());
                    return Ok(RowStatus::Pending);
                }
                Fill::Filled(_) => {}
            }
        }
    }

    /// Drain the whole source into `consumer`.
    ///
    /// Returns `true` once the stream has ended, `false` if the source went
    /// pending first; calling again resumes where it stopped.
    pub fn drain<C: CellConsumer>(&mut self, consumer: &mut C) -> Result<bool> {
        if self.finished {
            return Ok(true);
        }
        loop {
            {
                let mut tracked = RowTracker::new(&mut *consumer, &mut self.row_open);
                self.scanner.consume_all(&mut self.window, &mut tracked);
            }
            if self.exhausted {
                self.finished = true;
                finish_stream(
                    &mut self.scanner,
                    &mut self.window,
                    consumer,
                    &mut self.row_open,
                );
                return Ok(true);
            }
            match self.window.refill(&mut self.source)? {
                Fill::Exhausted => self.exhausted = true,
                Fill::Filled(0) | Fill::Pending => return Ok(false),
                Fill::Filled(_) => {}
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn window(&self) -> &CharWindow {
        &self.window
    }

    pub fn scan_state(&self) -> ScanState {
        self.scanner.state()
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

/// Drain `window`, flush the trailing cell and close the last row.
///
/// Returns whether a final row end was emitted by the flush.
pub(crate) fn finish_stream<C: CellConsumer>(
    scanner: &mut Scanner,
    window: &mut CharWindow,
    consumer: &mut C,
    row_open: &mut bool,
) -> bool {
    {
        let mut tracked = RowTracker::new(&mut *consumer, &mut *row_open);
        scanner.consume_all(window, &mut tracked);
        scanner.emit_trailing(window, &mut tracked);
    }
    let closed = *row_open;
    if closed {
        consumer.on_row_end();
        *row_open = false;
    }
    debug!(
        "end of stream: final row {}, window capacity {}",
        if closed { "flushed" } else { "empty" },
        window.capacity()
    );
    consumer.on_end();
    closed
}

/// Forwards to a consumer while recording whether a row is open.
pub(crate) struct RowTracker<'a, C: ?Sized> {
    inner: &'a mut C,
    open: &'a mut bool,
}

impl<'a, C: CellConsumer + ?Sized> RowTracker<'a, C> {
    pub(crate) fn new(inner: &'a mut C, open: &'a mut bool) -> Self {
        RowTracker { inner, open }
    }
}

impl<C: CellConsumer + ?Sized> CellConsumer for RowTracker<'_, C> {
    #[inline]
    fn on_cell(&mut self, cell: &[u8]) {
        *self.open = true;
        self.inner.on_cell(cell);
    }

    #[inline]
    fn on_row_end(&mut self) {
        *self.open = false;
        self.inner.on_row_end();
    }

    fn on_end(&mut self) {
        self.inner.on_end();
    }
}
