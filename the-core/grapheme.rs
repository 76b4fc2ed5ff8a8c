//! Display-width helpers over the unicode graphemes of a `&str`.
//!
//! Terminal surfaces address columns, not characters. These functions turn
//! byte offsets into column counts and cut strings down to a column budget
//! without splitting a grapheme cluster.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Returns the number of columns a single grapheme cluster occupies.
#[must_use]
pub fn grapheme_width(g: &str) -> usize {
  if g.is_ascii() {
    // Fast-path for pure ASCII: each byte renders with width 1.
    g.len()
  } else {
    // Ensure a minimum width of 1 for ill-formed clusters so a lone
    // combining mark still gets a cell.
    UnicodeWidthStr::width(g).max(1)
  }
}

/// Returns the display width of `s` in terminal columns.
#[must_use]
pub fn screen_len(s: &str) -> usize {
  if s.is_ascii() {
    return s.len();
  }
  s.graphemes(true).map(grapheme_width).sum()
}

/// Display width of the byte range `beg..end` of `s`.
///
/// Returns `None` when the range is out of bounds or does not fall on char
/// boundaries.
#[must_use]
pub fn screen_len_between(s: &str, beg: usize, end: usize) -> Option<usize> {
  s.get(beg..end).map(screen_len)
}

/// Iterates `(byte_offset, grapheme, width)` for every grapheme of `s`.
pub fn graphemes_with_width(s: &str) -> impl Iterator<Item = (usize, &str, usize)> {
  s.grapheme_indices(true)
    .map(|(idx, g)| (idx, g, grapheme_width(g)))
}

/// Cuts `s` down to the longest prefix of whole graphemes that fits in
/// `max_width` columns.
///
/// Returns the prefix together with its width.
#[must_use]
pub fn truncate_to_width(s: &str, max_width: usize) -> (&str, usize) {
  let mut width = 0;
  for (idx, _, w) in graphemes_with_width(s) {
    if width + w > max_width {
      return (&s[..idx], width);
    }
    width += w;
  }
  (s, width)
}

/// Converts a char index into a byte offset, clamping to `s.len()`.
#[must_use]
pub fn char_to_byte_idx(s: &str, char_idx: usize) -> usize {
  s.char_indices()
    .nth(char_idx)
    .map(|(idx, _)| idx)
    .unwrap_or(s.len())
}

/// Returns the display width of the first `char_idx` chars of `s`.
#[must_use]
pub fn width_until_char(s: &str, char_idx: usize) -> usize {
  screen_len(&s[..char_to_byte_idx(s, char_idx)])
}
