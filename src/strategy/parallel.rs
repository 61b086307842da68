// Parallel tokenization using rayon
//
// Strategy:
// 1. Single-threaded: walk the input row by row with the scanner, recording
//    each row's start offset and the scan state in force there
// 2. Parallel: tokenize every row range with its own window and a scanner
//    restored from the recorded state
//
// Restoring the state (not just the offset) keeps CRLF pairs and quoted runs
// that straddle a range boundary identical to a sequential scan.
//
// Results are owned rows; callers on the BEAM convert them to terms on the
// scheduler thread.

use crate::core::{CharWindow, Dialect, ScanState, Scanner};
use crate::strategy::direct::{tokenize_from, tokenize_with_config};
use rayon::prelude::*;

/// Tokenize `input` with rows processed in parallel. The result is identical
/// to `tokenize_with_config`.
pub fn tokenize_parallel(input: &[u8], dialect: Dialect) -> Vec<Vec<Vec<u8>>> {
    let starts = find_row_starts(input, dialect);

    starts
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, &(start, state))| {
            let end = starts.get(i + 1).map_or(input.len(), |&(next, _)| next);
            tokenize_from(&input[start..end], dialect, state)
        })
        .collect()
}

/// Tokenize independent documents in parallel, one window per document.
pub fn tokenize_batch<I>(inputs: &[I], dialect: Dialect) -> Vec<Vec<Vec<Vec<u8>>>>
where
    I: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .map(|input| tokenize_with_config(input.as_ref(), dialect))
        .collect()
}

/// Row start offsets with the scanner state at each of them.
fn find_row_starts(input: &[u8], dialect: Dialect) -> Vec<(usize, ScanState)> {
    let mut window = CharWindow::from_slice(input);
    let mut scanner = Scanner::new(dialect);
    let mut starts = vec![(0, ScanState::default())];

    while scanner.consume_to_next_row(&mut window, &mut ()) {
        if window.has_unscanned() {
            starts.push((window.cursor(), scanner.state()));
        }
    }

    starts
}
