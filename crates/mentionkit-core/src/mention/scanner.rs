//! Mention scanning.
//!
//! A mention is the marker character (default `@`) immediately followed by
//! one or more identifier characters (alphanumerics and `_`). The identifier
//! ends at the first character outside that set.
//!
//! Skipped without error:
//! - a marker with no identifier characters after it (`@ `, `@?`, trailing `@`)
//! - a marker glued to a preceding identifier character (`user@example`,
//!   the second marker in `@a@b`), which would overlap an earlier token

use std::iter::FusedIterator;

use mentionkit_types::mention::Mention;

/// Default mention marker.
pub const DEFAULT_MARKER: char = '@';

/// Scans text for mentions. Cheap to copy; holds only the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionScanner {
    marker: char,
}

impl MentionScanner {
    /// Scanner for the default `@` marker.
    pub fn new() -> Self {
        Self {
            marker: DEFAULT_MARKER,
        }
    }

    /// Scanner for a custom marker. The marker must not itself be an
    /// identifier character or whitespace.
    pub fn with_marker(marker: char) -> Result<Self, String> {
        if is_identifier_char(marker) || marker.is_whitespace() {
            return Err(format!("invalid mention marker: '{marker}'"));
        }
        Ok(Self { marker })
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    /// Lazily iterate the mentions in `text`, left to right.
    ///
    /// Nothing is allocated until a mention is yielded. Call again (or clone
    /// the iterator) to restart.
    pub fn scan<'a>(&self, text: &'a str) -> Mentions<'a> {
        Mentions {
            text,
            marker: self.marker,
            pos: 0,
        }
    }
}

impl Default for MentionScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the mentions of one text. See [`MentionScanner::scan`].
#[derive(Debug, Clone)]
pub struct Mentions<'a> {
    text: &'a str,
    marker: char,
    /// Byte offset where the next search starts.
    pos: usize,
}

impl Iterator for Mentions<'_> {
    type Item = Mention;

    fn next(&mut self) -> Option<Mention> {
        while self.pos < self.text.len() {
            let Some(offset) = self.text[self.pos..].find(self.marker) else {
                self.pos = self.text.len();
                return None;
            };

            let start = self.pos + offset;
            let id_start = start + self.marker.len_utf8();
            let id_len = identifier_len(&self.text[id_start..]);
            let end = id_start + id_len;

            // Resume after the token, or just past a bare marker.
            self.pos = end;

            if id_len == 0 || preceded_by_identifier(self.text, start) {
                continue;
            }

            return Some(Mention {
                raw_token: self.text[start..end].to_owned(),
                candidate_id: self.text[id_start..end].to_owned(),
                span: (start, end),
            });
        }

        None
    }
}

impl FusedIterator for Mentions<'_> {}

/// Characters allowed in a mention identifier.
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `id` is reachable by a mention: non-empty and made only of
/// identifier characters.
pub fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty() && id.chars().all(is_identifier_char)
}

/// Byte length of the identifier prefix of `s`.
fn identifier_len(s: &str) -> usize {
    s.char_indices()
        .find(|(_, c)| !is_identifier_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn preceded_by_identifier(text: &str, at: usize) -> bool {
    text[..at]
        .chars()
        .next_back()
        .is_some_and(is_identifier_char)
}
