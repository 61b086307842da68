// flatcsv - streaming CSV tokenizer
//
// Layers:
// core:     window, scanner state machine, in-place cell extraction
// strategy: drivers on top of the scanner
//   direct    one-shot tokenize of an in-memory input
//   reader    pull driver over a RefillSource, row at a time
//   streaming push driver (feed / take_rows / finalize)
//   parallel  row-parallel and batch tokenization via rayon
//
// The NIF functions below expose the drivers as Elixir.FlatCsv.Native.

use rustler::{Binary, Env, Error as NifError, NifResult, ResourceArc, Term};

pub mod core;
pub mod error;
pub mod memory;
pub mod resource;
pub mod strategy;
mod term;

pub use crate::core::{CellConsumer, CharWindow, Dialect, RowCollector, ScanState, Scanner};
pub use error::{Error, Result};

use resource::{TokenizerRef, TokenizerResource};
use term::rows_to_term;

/// Decode a dialect byte: integer 44 or one-byte binary <<44>>.
fn decode_byte(term: Term) -> NifResult<u8> {
    if let Ok(byte) = term.decode::<u8>() {
        return Ok(byte);
    }
    if let Ok(binary) = term.decode::<Binary>() {
        if let [byte] = binary.as_slice() {
            return Ok(*byte);
        }
    }
    Err(NifError::BadArg)
}

fn decode_dialect(sep_term: Term, quote_term: Term) -> NifResult<Dialect> {
    let separator = decode_byte(sep_term)?;
    let quote = decode_byte(quote_term)?;
    Dialect::new(separator, quote).map_err(|_| NifError::BadArg)
}

// ============================================================================
// Memory introspection
// ============================================================================

/// Current Rust heap usage in bytes (0 without memory_tracking)
#[rustler::nif]
fn get_rust_memory() -> usize {
    memory::current()
}

/// Peak Rust heap usage since the last reset (0 without memory_tracking)
#[rustler::nif]
fn get_rust_memory_peak() -> usize {
    memory::peak()
}

/// Reset peak tracking, returning {current, previous_peak}
#[rustler::nif]
fn reset_rust_memory_stats() -> (usize, usize) {
    memory::reset_peak()
}

// ============================================================================
// One-shot tokenization
// ============================================================================

/// Tokenize a binary into a list of rows (comma, double quote)
#[rustler::nif]
fn tokenize<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    let rows = strategy::tokenize(input.as_slice());
    Ok(rows_to_term(env, rows))
}

/// Tokenize with a configurable separator and quote
#[rustler::nif]
fn tokenize_with_config<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    sep_term: Term<'a>,
    quote_term: Term<'a>,
) -> NifResult<Term<'a>> {
    let dialect = decode_dialect(sep_term, quote_term)?;
    let rows = strategy::tokenize_with_config(input.as_slice(), dialect);
    Ok(rows_to_term(env, rows))
}

/// Tokenize rows in parallel on the rayon pool
/// Uses DirtyCpu scheduler since this can take significant time
#[rustler::nif(schedule = "DirtyCpu")]
fn tokenize_parallel<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    sep_term: Term<'a>,
    quote_term: Term<'a>,
) -> NifResult<Term<'a>> {
    let dialect = decode_dialect(sep_term, quote_term)?;
    let rows = strategy::tokenize_parallel(input.as_slice(), dialect);
    Ok(rows_to_term(env, rows))
}

// ============================================================================
// Streaming tokenizer
// ============================================================================

/// Create a streaming tokenizer with default settings
#[rustler::nif]
fn streaming_new() -> TokenizerRef {
    ResourceArc::new(TokenizerResource::new())
}

/// Create a streaming tokenizer with a configurable separator and quote
#[rustler::nif]
fn streaming_new_with_config<'a>(sep_term: Term<'a>, quote_term: Term<'a>) -> NifResult<TokenizerRef> {
    let separator = decode_byte(sep_term)?;
    let quote = decode_byte(quote_term)?;
    let resource = TokenizerResource::with_config(separator, quote).map_err(|_| NifError::BadArg)?;
    Ok(ResourceArc::new(resource))
}

/// Feed a chunk; returns {available_rows, buffer_size}
#[rustler::nif]
fn streaming_feed(tokenizer: TokenizerRef, chunk: Binary) -> (usize, usize) {
    let mut inner = tokenizer.inner.lock().unwrap();
    inner.feed(chunk.as_slice());
    (inner.available_rows(), inner.buffer_size())
}

/// Take up to `max` complete rows
#[rustler::nif]
fn streaming_next_rows<'a>(env: Env<'a>, tokenizer: TokenizerRef, max: usize) -> NifResult<Term<'a>> {
    let mut inner = tokenizer.inner.lock().unwrap();
    let rows = inner.take_rows(max);
    Ok(rows_to_term(env, rows))
}

/// Flush the unfinished row and return every remaining row
#[rustler::nif]
fn streaming_finalize<'a>(env: Env<'a>, tokenizer: TokenizerRef) -> NifResult<Term<'a>> {
    let mut inner = tokenizer.inner.lock().unwrap();
    let rows = inner.finalize();
    Ok(rows_to_term(env, rows))
}

/// {available_rows, buffer_size, has_partial}
#[rustler::nif]
fn streaming_status(tokenizer: TokenizerRef) -> (usize, usize, bool) {
    let inner = tokenizer.inner.lock().unwrap();
    (
        inner.available_rows(),
        inner.buffer_size(),
        inner.has_partial(),
    )
}

rustler::init!("Elixir.FlatCsv.Native");
