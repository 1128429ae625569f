//! Transliteration between Brainfuck and an opaque token alphabet.
//!
//! A mapping file is a JSON object with one entry per instruction
//! character, each mapping to a fixed-width token, e.g.
//!
//! ```json
//! { ">": "へへへ", "<": "へへヘ", "+": "へヘへ", "-": "へヘヘ",
//!   ".": "ヘへへ", ",": "ヘへヘ", "[": "ヘヘへ", "]": "ヘヘヘ" }
//! ```
//!
//! Encoding substitutes each instruction character with its token and
//! concatenates the tokens with no separators. Decoding filters the text
//! down to the glyphs the tokens are built from, splits it into
//! fixed-width chunks, and inverts each chunk.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Errors raised while loading a mapping table or decoding with it.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// The mapping file could not be read.
    #[error("failed to read mapping file: {0}")]
    Io(#[from] std::io::Error),

    /// The mapping file was not a valid JSON object of strings.
    #[error("mapping file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A mapping key was not a single instruction character.
    #[error("mapping key must be a single character, got {key:?}")]
    BadKey { key: String },

    /// The table contained an empty token.
    #[error("mapping token for {key:?} is empty")]
    EmptyToken { key: char },

    /// Tokens in one table must all be the same width.
    #[error("mapping token for {key:?} is {got} glyphs wide, expected {expected}")]
    UnevenToken { key: char, got: usize, expected: usize },

    /// Two instruction characters mapped to the same token, so the table
    /// cannot be inverted.
    #[error("mapping is not a bijection: token {token:?} appears twice")]
    DuplicateToken { token: String },

    /// The encoded text does not divide into whole tokens.
    #[error("encoded text is {len} glyphs, not a multiple of the token width {width}")]
    TruncatedInput { len: usize, width: usize },

    /// A token in the encoded text has no inverse in the table.
    #[error("unknown token {token:?} at token index {index}")]
    UnknownToken { token: String, index: usize },
}

/// A bijective table between instruction characters and fixed-width tokens.
///
/// Built once from a JSON file (or an in-memory table) and then used for
/// both directions of the transliteration.
pub struct Mapping {
    forward: HashMap<char, String>,
    inverse: HashMap<String, char>,
    /// Glyphs that tokens are built from; anything else in an encoded
    /// text is decoration and is skipped before chunking.
    glyphs: HashSet<char>,
    /// Token width in glyphs, uniform across the table.
    width: usize,
}

impl Mapping {
    /// Load and validate a mapping table from a JSON file.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let text = fs::read_to_string(path)?;
        let table: HashMap<String, String> = serde_json::from_str(&text)?;
        Self::from_table(table)
    }

    /// Build a mapping from an already-parsed table.
    ///
    /// Keys must be single characters, tokens must be non-empty, uniform
    /// in width, and pairwise distinct.
    pub fn from_table(table: HashMap<String, String>) -> Result<Self, MappingError> {
        let mut forward = HashMap::new();
        let mut inverse = HashMap::new();
        let mut glyphs = HashSet::new();
        let mut width = 0usize;

        for (key, token) in table {
            let mut key_chars = key.chars();
            let (Some(key_char), None) = (key_chars.next(), key_chars.next()) else {
                return Err(MappingError::BadKey { key });
            };

            let token_width = token.chars().count();
            if token_width == 0 {
                return Err(MappingError::EmptyToken { key: key_char });
            }
            if width == 0 {
                width = token_width;
            } else if token_width != width {
                return Err(MappingError::UnevenToken {
                    key: key_char,
                    got: token_width,
                    expected: width,
                });
            }

            glyphs.extend(token.chars());
            if inverse.insert(token.clone(), key_char).is_some() {
                return Err(MappingError::DuplicateToken { token });
            }
            forward.insert(key_char, token);
        }

        Ok(Self { forward, inverse, glyphs, width })
    }

    /// Token width in glyphs.
    pub fn token_width(&self) -> usize {
        self.width
    }

    /// Transliterate `source` into the token alphabet.
    ///
    /// Characters without a table entry (comments, whitespace) are
    /// dropped; mapped tokens are concatenated with no separators.
    pub fn encode(&self, source: &str) -> String {
        source
            .chars()
            .filter_map(|c| self.forward.get(&c).map(String::as_str))
            .collect()
    }

    /// Invert `encoded` back into an instruction stream.
    ///
    /// Glyphs outside the token alphabet (newlines, decoration) are
    /// skipped first, then the rest must split cleanly into known tokens.
    pub fn decode(&self, encoded: &str) -> Result<String, MappingError> {
        if self.width == 0 {
            // Empty table: nothing is a token glyph, nothing decodes.
            return Ok(String::new());
        }

        let glyphs: Vec<char> =
            encoded.chars().filter(|c| self.glyphs.contains(c)).collect();

        if glyphs.len() % self.width != 0 {
            return Err(MappingError::TruncatedInput {
                len: glyphs.len(),
                width: self.width,
            });
        }

        let mut code = String::with_capacity(glyphs.len() / self.width);
        for (index, chunk) in glyphs.chunks(self.width).enumerate() {
            let token: String = chunk.iter().collect();
            let Some(&c) = self.inverse.get(&token) else {
                return Err(MappingError::UnknownToken { token, index });
            };
            code.push(c);
        }

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize;

    fn he_table() -> HashMap<String, String> {
        [
            (">", "へへへ"),
            ("<", "へへヘ"),
            ("+", "へヘへ"),
            ("-", "へヘヘ"),
            (".", "ヘへへ"),
            (",", "ヘへヘ"),
            ("[", "ヘヘへ"),
            ("]", "ヘヘヘ"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn encode_concatenates_tokens_without_separators() {
        let mapping = Mapping::from_table(he_table()).expect("valid table");
        assert_eq!(mapping.encode("+-"), "へヘへへヘヘ");
    }

    #[test]
    fn encode_drops_unmapped_characters() {
        let mapping = Mapping::from_table(he_table()).expect("valid table");
        assert_eq!(mapping.encode("+ comment -"), "へヘへへヘヘ");
    }

    #[test]
    fn decode_inverts_encode_on_sanitized_streams() {
        let mapping = Mapping::from_table(he_table()).expect("valid table");
        let code = sanitize("++[>.<-],");
        let decoded = mapping.decode(&mapping.encode(&code)).expect("round trip");
        assert_eq!(decoded, code);
    }

    #[test]
    fn decode_skips_decoration_glyphs() {
        let mapping = Mapping::from_table(he_table()).expect("valid table");
        // Trailing newline and spaces are not token glyphs.
        let decoded = mapping.decode("へヘへ ヘへへ\n").expect("clean after filter");
        assert_eq!(decoded, "+.");
    }

    #[test]
    fn decode_rejects_truncated_input() {
        let mapping = Mapping::from_table(he_table()).expect("valid table");
        let result = mapping.decode("へへ");
        assert!(matches!(
            result,
            Err(MappingError::TruncatedInput { len: 2, width: 3 })
        ));
    }

    #[test]
    fn decode_rejects_unknown_token() {
        // Width-2 table over glyphs 'a' and 'b'; "aa" is never produced.
        let table: HashMap<String, String> = [("+", "ab"), ("-", "ba")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mapping = Mapping::from_table(table).expect("valid table");
        let result = mapping.decode("abaa");
        assert!(matches!(
            result,
            Err(MappingError::UnknownToken { index: 1, .. })
        ));
    }

    #[test]
    fn duplicate_tokens_are_rejected() {
        let mut table = he_table();
        table.insert("]".to_string(), "へへへ".to_string()); // same as '>'
        let result = Mapping::from_table(table);
        assert!(matches!(result, Err(MappingError::DuplicateToken { .. })));
    }

    #[test]
    fn uneven_token_widths_are_rejected() {
        let mut table = he_table();
        table.insert("]".to_string(), "へへ".to_string());
        let result = Mapping::from_table(table);
        // Table iteration order is arbitrary, so only the variant is stable.
        assert!(matches!(result, Err(MappingError::UnevenToken { .. })));
    }

    #[test]
    fn multi_character_keys_are_rejected() {
        let mut table = he_table();
        table.insert(">>".to_string(), "ヘヘヘへ".to_string());
        let result = Mapping::from_table(table);
        assert!(matches!(result, Err(MappingError::BadKey { .. })));
    }

    #[test]
    fn json_round_trip_through_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mapping.json");
        let json = serde_json::to_string(&he_table()).expect("serialize");
        std::fs::write(&path, json).expect("write mapping");

        let mapping = Mapping::load(&path).expect("load mapping");
        assert_eq!(mapping.token_width(), 3);
        assert_eq!(mapping.decode(&mapping.encode("[-]")).expect("round trip"), "[-]");
    }
}
