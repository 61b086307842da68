// One-shot tokenization of an in-memory input.
//
// The input is copied into a window once (unescaping rewrites the window in
// place) and drained with the same end-of-stream policy as the stream
// drivers.

use crate::core::{CellConsumer, CharWindow, Dialect, RowCollector, ScanState, Scanner};
use crate::strategy::reader::finish_stream;

/// Tokenize `input` with the default dialect into owned rows.
pub fn tokenize(input: &[u8]) -> Vec<Vec<Vec<u8>>> {
    tokenize_with_config(input, Dialect::default())
}

/// Tokenize `input` into owned rows.
pub fn tokenize_with_config(input: &[u8], dialect: Dialect) -> Vec<Vec<Vec<u8>>> {
    tokenize_from(input, dialect, ScanState::default())
}

/// Tokenize `input` as a continuation of a stream whose scanner was in
/// `state` right before the first byte.
pub fn tokenize_from(input: &[u8], dialect: Dialect, state: ScanState) -> Vec<Vec<Vec<u8>>> {
    let mut rows = RowCollector::new();
    scan_from(input, dialect, state, &mut rows);
    rows.into_rows()
}

/// Stream every cell of `input` into `consumer` without collecting.
pub fn for_each_cell<C: CellConsumer>(input: &[u8], dialect: Dialect, consumer: &mut C) {
    scan_from(input, dialect, ScanState::default(), consumer);
}

fn scan_from<C: CellConsumer>(input: &[u8], dialect: Dialect, state: ScanState, consumer: &mut C) {
    let mut window = CharWindow::from_slice(input);
    let mut scanner = Scanner::with_state(dialect, state);
    let mut row_open = false;
    finish_stream(&mut scanner, &mut window, consumer, &mut row_open);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CellCounter;

    fn strings(rows: Vec<Vec<Vec<u8>>>) -> Vec<Vec<String>> {
        rows.into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|f| String::from_utf8_lossy(&f).to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_tokenize_simple() {
        assert_eq!(
            strings(tokenize(b"a,b,c\n1,2,3\n")),
            vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]
        );
    }

    #[test]
    fn test_trailing_row_without_newline() {
        assert_eq!(
            strings(tokenize(b"a,b\nc,d")),
            vec![vec!["a", "b"], vec!["c", "d"]]
        );
    }

    #[test]
    fn test_trailing_separator_closes_row() {
        assert_eq!(strings(tokenize(b"a,b,")), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize(b"").is_empty());
    }

    #[test]
    fn test_unterminated_quote_at_end() {
        assert_eq!(strings(tokenize(b"a,\"bc")), vec![vec!["a", "bc"]]);
    }

    #[test]
    fn test_for_each_cell_counts() {
        let mut counter = CellCounter::default();
        for_each_cell(b"a,b\n\"c\"\"d\"\n", Dialect::default(), &mut counter);
        assert_eq!(counter.cells, 3);
        assert_eq!(counter.rows, 2);
        assert_eq!(counter.bytes, 5);
    }

    #[test]
    fn test_tokenize_from_after_cr() {
        let state = ScanState {
            quoted: false,
            after_cr: true,
        };
        assert_eq!(
            strings(tokenize_from(b"\nx\n", Dialect::default(), state)),
            vec![vec!["x"]]
        );
    }
}
