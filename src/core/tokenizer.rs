// RouteWatch - core/tokenizer.rs
//
// Splits a log line into its delimiter-separated fields.
// Core layer: pure logic, no I/O.

/// Split `line` on every occurrence of `delimiter`.
///
/// Consecutive delimiters are not merged: they yield empty fields, which is
/// what lets padded level columns be matched positionally. No trimming is
/// done beyond the split itself, and an empty line yields a single empty
/// field.
pub fn tokenize(line: &str, delimiter: char) -> Vec<&str> {
    line.split(delimiter).collect()
}

/// Strip one trailing `\n` or `\r\n` terminator.
///
/// A `\r` without a following `\n` is content, not a terminator.
pub fn strip_terminator(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(body) => body.strip_suffix('\r').unwrap_or(body),
        None => line,
    }
}
