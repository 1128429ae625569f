//! Shared stderr reporting for the CLI binaries.

use std::io::{self, Write};

use crate::BrainfuckError;

/// Pretty-print a [`BrainfuckError`] with caret positioning.
///
/// `code` must be the sanitized instruction stream, since the error's
/// instruction index counts sanitized positions. If `program` is given,
/// messages are prefixed with it, e.g. `bf: ...`.
pub fn print_syntax_error(program: Option<&str>, code: &str, err: &BrainfuckError) {
    let msg = match program {
        Some(p) => format!("{p}: syntax error: {err}"),
        None => format!("syntax error: {err}"),
    };

    let BrainfuckError::UnmatchedBracket { ip, .. } = err;
    print_error_with_context(&msg, code, *ip);
}

/// Print a concise error followed by a caret context window, working with
/// UTF-8 by slicing using char indices.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    eprintln!("{prefix}");

    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);
    eprintln!("  {}", &code[start_byte..end_byte]);

    // Caret under the exact position
    let caret_offset = pos.saturating_sub(start_char);
    eprintln!("  {}^", " ".repeat(caret_offset));
    let _ = io::stderr().flush();
}

/// Convert a char index into a byte index in the given UTF-8 string,
/// clamping past-the-end indices to the string's length.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_index_maps_to_byte_index_in_multibyte_text() {
        let s = "へヘ+";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 1), 3);
        assert_eq!(char_to_byte_index(s, 2), 6);
        assert_eq!(char_to_byte_index(s, 3), 7);
    }

    #[test]
    fn char_index_past_end_clamps_to_len() {
        assert_eq!(char_to_byte_index("+-", 10), 2);
    }
}
