// Term building for tokenized rows

use rustler::{Env, NewBinary, Term};

/// Convert owned rows to an Elixir list of lists of binaries
pub fn rows_to_term<'a>(env: Env<'a>, rows: Vec<Vec<Vec<u8>>>) -> Term<'a> {
    // Build list in reverse (cons lists prepend cheaply)
    let mut list = Term::list_new_empty(env);

    for row in rows.into_iter().rev() {
        let row_term = cells_to_term(env, row);
        list = list.list_prepend(row_term);
    }

    list
}

/// Convert one row's cells to an Elixir list of binaries
pub fn cells_to_term<'a>(env: Env<'a>, cells: Vec<Vec<u8>>) -> Term<'a> {
    let mut list = Term::list_new_empty(env);

    for cell in cells.into_iter().rev() {
        list = list.list_prepend(binary_term(env, &cell));
    }

    list
}

fn binary_term<'a>(env: Env<'a>, bytes: &[u8]) -> Term<'a> {
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
