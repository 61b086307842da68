// Push driver: stateful chunked tokenizer for bounded-memory processing.
//
// Feed chunks of data and take complete rows as they become available.
//
// Key design:
// - Owns its window because input chunks are temporary
// - Each feed drains the window; only the unfinished row stays buffered
// - Rows are handed out in batches to keep per-call overhead low

use crate::core::{CharWindow, Dialect, RowCollector, Scanner};
use crate::error::Result;
use crate::strategy::reader::{finish_stream, RowTracker};

pub struct StreamingTokenizer {
    window: CharWindow,
    scanner: Scanner,
    rows: RowCollector,
    row_open: bool,
}

impl StreamingTokenizer {
    /// Comma separator, double-quote quoting.
    pub fn new() -> Self {
        Self::with_dialect(Dialect::default())
    }

    pub fn with_config(separator: u8, quote: u8) -> Result<Self> {
        Ok(Self::with_dialect(Dialect::new(separator, quote)?))
    }

    pub fn with_dialect(dialect: Dialect) -> Self {
        StreamingTokenizer {
            window: CharWindow::new(),
            scanner: Scanner::new(dialect),
            rows: RowCollector::new(),
            row_open: false,
        }
    }

    /// Append a chunk and tokenize everything it completes.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.window.extend_from_slice(chunk);
        let mut tracked = RowTracker::new(&mut self.rows, &mut self.row_open);
        self.scanner.consume_all(&mut self.window, &mut tracked);
    }

    /// Take up to `max` complete rows.
    pub fn take_rows(&mut self, max: usize) -> Vec<Vec<Vec<u8>>> {
        self.rows.take_rows(max)
    }

    pub fn available_rows(&self) -> usize {
        self.rows.available_rows()
    }

    /// True if an unfinished row is buffered (cells already split off, or
    /// bytes not yet terminated).
    pub fn has_partial(&self) -> bool {
        self.rows.has_open_row() || !self.window.pending().is_empty()
    }

    /// Bytes currently held for the unfinished row.
    pub fn buffer_size(&self) -> usize {
        self.window.pending().len()
    }

    pub fn dialect(&self) -> Dialect {
        self.scanner.dialect()
    }

    /// End of input: flush the unfinished row and return every row not yet
    /// taken. Feeding afterwards starts a fresh stream.
    pub fn finalize(&mut self) -> Vec<Vec<Vec<u8>>> {
        finish_stream(
            &mut self.scanner,
            &mut self.window,
            &mut self.rows,
            &mut self.row_open,
        );
        let rows = self.rows.take_rows(usize::MAX);
        self.reset();
        rows
    }

    /// Drop all buffered data and scan state; the dialect is kept.
    pub fn reset(&mut self) {
        self.window.clear();
        self.scanner.reset();
        self.rows.clear();
        self.row_open = false;
    }
}

impl Default for StreamingTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Common scenarios live in tests/conformance.rs.
    // Only streaming-specific tests remain here.

    #[test]
    fn test_streaming_chunked() {
        let mut tok = StreamingTokenizer::new();
        tok.feed(b"a,b,");
        assert_eq!(tok.available_rows(), 0);
        assert!(tok.has_partial());

        tok.feed(b"c\n1,2,3\n");
        assert_eq!(tok.available_rows(), 2);

        let rows = tok.take_rows(10);
        assert_eq!(rows[0], vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert!(!tok.has_partial());
    }

    #[test]
    fn test_streaming_quoted_across_chunks() {
        let mut tok = StreamingTokenizer::new();
        tok.feed(b"a,\"hello ");
        assert_eq!(tok.available_rows(), 0);

        tok.feed(b"world\",c\n");
        assert_eq!(tok.available_rows(), 1);

        let rows = tok.take_rows(10);
        assert_eq!(
            rows[0],
            vec![b"a".to_vec(), b"hello world".to_vec(), b"c".to_vec()]
        );
    }

    #[test]
    fn test_streaming_finalize() {
        let mut tok = StreamingTokenizer::new();
        tok.feed(b"a,b,c\n1,2,3");

        let rows1 = tok.take_rows(10);
        assert_eq!(rows1.len(), 1);

        let rows2 = tok.finalize();
        assert_eq!(rows2, vec![vec![b"1".to_vec(), b"2".to_vec(), b"3".to_vec()]]);
        assert!(!tok.has_partial());
        assert_eq!(tok.buffer_size(), 0);
    }

    #[test]
    fn test_crlf_split_across_feeds() {
        let mut tok = StreamingTokenizer::new();
        tok.feed(b"a,b\r");
        assert_eq!(tok.available_rows(), 1);

        tok.feed(b"\nc,d\n");
        let rows = tok.take_rows(10);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec![b"c".to_vec(), b"d".to_vec()]);
    }

    #[test]
    fn test_buffer_holds_only_unfinished_row() {
        let mut tok = StreamingTokenizer::new();
        tok.feed(b"first,row\nsecond,ro");
        assert_eq!(tok.buffer_size(), 2);
        assert_eq!(tok.available_rows(), 1);
    }

    #[test]
    fn test_with_config_rejects_bad_dialect() {
        assert!(StreamingTokenizer::with_config(b'\n', b'"').is_err());
        let tok = StreamingTokenizer::with_config(b'\t', b'\'').unwrap();
        assert_eq!(tok.dialect().separator(), b'\t');
    }

    #[test]
    fn test_reset_keeps_dialect() {
        let mut tok = StreamingTokenizer::with_config(b';', b'"').unwrap();
        tok.feed(b"x;\"unfinished");
        tok.reset();
        assert!(!tok.has_partial());
        tok.feed(b"a;b\n");
        assert_eq!(tok.take_rows(1), vec![vec![b"a".to_vec(), b"b".to_vec()]]);
    }
}
