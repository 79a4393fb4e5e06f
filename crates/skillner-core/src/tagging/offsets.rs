//! Byte <-> character offset conversion.
//!
//! Regex matches report byte offsets; every span, label array and token
//! offset in this crate counts characters. Convert once at the boundary.

/// Character-boundary index over a text.
#[derive(Debug, Clone)]
pub struct CharIndex<'a> {
    text: &'a str,
    /// Byte offset of every character start, plus `text.len()` as sentinel.
    boundaries: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        boundaries.push(text.len());
        Self { text, boundaries }
    }

    /// Number of characters in the text.
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Character offset of a byte offset.
    ///
    /// Offsets inside a multi-byte character resolve to that character.
    pub fn char_of(&self, byte: usize) -> usize {
        match self.boundaries.binary_search(&byte) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Byte offset of a character offset, clamped to the text end.
    pub fn byte_of(&self, ch: usize) -> usize {
        self.boundaries[ch.min(self.char_len())]
    }

    /// Slice by character offsets. Out-of-range ends are clamped.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        let (start, end) = (self.byte_of(start), self.byte_of(end));
        if start >= end {
            return "";
        }
        &self.text[start..end]
    }
}
