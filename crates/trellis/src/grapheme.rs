//! Grapheme-cluster helpers for caret movement and text measurement.

use unicode_display_width::width as display_width_impl;
use unicode_segmentation::UnicodeSegmentation;

/// Terminal cell width of `text`.
pub(crate) fn display_width(text: &str) -> usize {
    display_width_impl(text) as usize
}

pub(crate) fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Byte offset of the grapheme at `grapheme_index`, or `text.len()` past the end.
pub(crate) fn grapheme_byte_index(text: &str, grapheme_index: usize) -> usize {
    text.grapheme_indices(true)
        .nth(grapheme_index)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Byte range covering graphemes `start..end`.
pub(crate) fn grapheme_byte_range(text: &str, start: usize, end: usize) -> (usize, usize) {
    (
        grapheme_byte_index(text, start),
        grapheme_byte_index(text, end),
    )
}

/// The first `count` graphemes of `text`.
pub(crate) fn grapheme_prefix(text: &str, count: usize) -> &str {
    &text[..grapheme_byte_index(text, count)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combining_sequence_is_one_grapheme() {
        let text = "e\u{301}x";
        assert_eq!(grapheme_count(text), 2);
        assert_eq!(grapheme_byte_index(text, 1), 3);
        assert_eq!(grapheme_prefix(text, 1), "e\u{301}");
    }

    #[test]
    fn test_byte_index_past_end() {
        assert_eq!(grapheme_byte_index("abc", 10), 3);
        assert_eq!(grapheme_byte_range("abcd", 1, 3), (1, 3));
    }

    #[test]
    fn test_display_width_wide_chars() {
        assert_eq!(display_width("ab"), 2);
        assert_eq!(display_width("日本"), 4);
    }
}
