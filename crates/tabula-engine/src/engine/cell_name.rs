//! Variable and cell name syntax.
//!
//! Two grammars are in play:
//!
//! - a *variable* is a letter or underscore followed by letters, underscores
//!   and digits (`x`, `_tmp`, `AB12`);
//! - a *cell name* is one or more letters followed by one or more digits
//!   (`A1`, `ab10`, `ZZ999`).
//!
//! Every cell name is a variable, but not the other way around.

use regex::Regex;
use std::sync::OnceLock;

/// Returns true if `name` is syntactically a variable.
pub fn is_variable(name: &str) -> bool {
    variable_re().is_match(name)
}

/// Returns true if `name` is syntactically a cell name.
pub fn is_cell_name(name: &str) -> bool {
    cell_name_re().is_match(name)
}

/// Sort key that orders cell names the way a grid reads: by row, then by
/// column, with columns compared as spreadsheet letters (`Z` < `AA`).
///
/// Ties (`a1` and `A1`) are broken by the text. Names that are not cell
/// names (or overflow) sort after all cell names.
pub fn cell_order_key(name: &str) -> (usize, usize, String) {
    match parse_a1(name) {
        Some((col, row)) => (row, col, name.to_string()),
        None => (usize::MAX, usize::MAX, name.to_string()),
    }
}

/// Parse a cell name into zero-indexed (column, row).
fn parse_a1(name: &str) -> Option<(usize, usize)> {
    let caps = cell_name_re().captures(name)?;
    let letters = &caps["letters"];
    let numbers = &caps["numbers"];

    let mut col_acc = 0usize;
    for c in letters.to_ascii_uppercase().bytes() {
        let digit = (c - b'A') as usize + 1;
        col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
    }
    let col = col_acc.checked_sub(1)?;
    let row = numbers.parse::<usize>().ok()?;

    Some((col, row))
}

fn variable_re() -> &'static Regex {
    static VARIABLE_RE: OnceLock<Regex> = OnceLock::new();
    VARIABLE_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z_0-9]*$").expect("variable regex must compile")
    })
}

fn cell_name_re() -> &'static Regex {
    static CELL_NAME_RE: OnceLock<Regex> = OnceLock::new();
    CELL_NAME_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$")
            .expect("cell name regex must compile")
    })
}
