//! Translation of match offsets from original-line to folded-line coordinates.
//!
//! Matching runs against the original line, drawing runs against the folded
//! one. Every occurrence is moved left (or right) by the size change of the
//! folded fields that precede it; an occurrence inside a folded field covers
//! the whole placeholder.

use std::borrow::Cow;

use crate::{
  fields::{
    Span,
    field_at,
  },
  fold::FoldSpec,
};

/// One sub-query hit: `len` bytes starting at byte `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Occurrence {
  pub offset: usize,
  pub len:    usize,
}

impl Occurrence {
  pub const fn new(offset: usize, len: usize) -> Self {
    Self { offset, len }
  }

  /// Exclusive end, `None` when it does not fit in `usize`.
  pub const fn end(&self) -> Option<usize> {
    self.offset.checked_add(self.len)
  }
}

/// Marker produced by the matcher for "the whole line matched, nothing to
/// highlight".
pub const WHOLE_LINE: &[Occurrence] = &[Occurrence::new(0, 0)];

pub fn is_whole_line(occurrences: &[Occurrence]) -> bool {
  occurrences == WHOLE_LINE
}

/// Moves `occurrences` from the coordinate space of `original` into that of
/// `folded`.
///
/// `original` and `folded` are the field spans of the line before and after
/// folding with `spec`. Occurrences whose offset is not inside any field are
/// dropped.
pub fn remap<'a>(
  original: &[Span],
  folded: &[Span],
  occurrences: &'a [Occurrence],
  spec: &FoldSpec,
  placeholder: &str,
) -> Cow<'a, [Occurrence]> {
  if spec.is_empty() || is_whole_line(occurrences) {
    return Cow::Borrowed(occurrences);
  }

  let mut out = Vec::with_capacity(occurrences.len());
  for occurrence in occurrences {
    let Some(field) = field_at(original, occurrence.offset) else {
      log::trace!(
        "match at {} lies outside every field, skipping",
        occurrence.offset
      );
      continue;
    };

    if spec.contains(field) {
      let Some(span) = folded.get(field) else {
        log::trace!("folded line lost field {field}, skipping match");
        continue;
      };
      out.push(Occurrence::new(span.start, placeholder.len()));
      continue;
    }

    let span = original[field];
    let len = occurrence.len.min(span.end - occurrence.offset);
    let delta: isize = original
      .iter()
      .enumerate()
      .filter(|(idx, span)| spec.contains(*idx) && span.end <= occurrence.offset)
      .map(|(_, span)| placeholder.len() as isize - span.len() as isize)
      .sum();
    match occurrence.offset.checked_add_signed(delta) {
      Some(offset) => out.push(Occurrence::new(offset, len)),
      None => log::trace!("match at {} shifted below zero", occurrence.offset),
    }
  }
  Cow::Owned(out)
}

#[cfg(test)]
mod test {
  use quickcheck::quickcheck;

  use super::*;
  use crate::{
    fields::{
      Separator,
      spans,
    },
    fold::{
      FOLDED,
      fold,
    },
  };

  fn remap_line(line: &str, folded_fields: &[usize], occurrences: &[Occurrence]) -> (String, Vec<Occurrence>) {
    let sep = Separator::default();
    let spec: FoldSpec = folded_fields.iter().copied().collect();
    let original = spans(line, &sep);
    let folded = fold(line, &sep, &spec, FOLDED);
    let remapped = remap(&original, &folded.spans, occurrences, &spec, FOLDED).into_owned();
    (folded.text.into_owned(), remapped)
  }

  #[test]
  fn match_after_folded_field_shifts_left() {
    let line = "alpha >< beta >< gamma";
    let (text, out) = remap_line(line, &[0], &[Occurrence::new(17, 3)]);
    assert_eq!(text, ".. >< beta >< gamma");
    assert_eq!(out, vec![Occurrence::new(14, 3)]);
    assert_eq!(&text[14..17], "gam");
  }

  #[test]
  fn match_inside_folded_field_covers_placeholder() {
    let line = "alpha >< beta >< gamma";
    let (text, out) = remap_line(line, &[1], &[Occurrence::new(10, 2)]);
    assert_eq!(out, vec![Occurrence::new(9, 2)]);
    assert_eq!(&text[9..11], FOLDED);
  }

  #[test]
  fn match_before_folded_field_is_unchanged() {
    let (_, out) = remap_line("alpha >< beta >< gamma", &[2], &[Occurrence::new(1, 3)]);
    assert_eq!(out, vec![Occurrence::new(1, 3)]);
  }

  #[test]
  fn short_folded_field_shifts_right() {
    // "a" grows into ".." so everything after moves one byte right
    let line = "a >< bcd";
    let (text, out) = remap_line(line, &[0], &[Occurrence::new(5, 2)]);
    assert_eq!(text, ".. >< bcd");
    assert_eq!(out, vec![Occurrence::new(6, 2)]);
    assert_eq!(&text[6..8], "bc");
  }

  #[test]
  fn several_folded_fields_accumulate() {
    let line = "aaaa >< bbbb >< cccc >< dddd";
    let (text, out) = remap_line(line, &[0, 2], &[
      Occurrence::new(24, 4),
      Occurrence::new(8, 2),
    ]);
    assert_eq!(text, ".. >< bbbb >< .. >< dddd");
    assert_eq!(out, vec![Occurrence::new(20, 4), Occurrence::new(6, 2)]);
    assert_eq!(&text[20..24], "dddd");
  }

  #[test]
  fn whole_line_marker_passes_through() {
    let (_, out) = remap_line("a >< b", &[0], WHOLE_LINE);
    assert_eq!(out, WHOLE_LINE);
  }

  #[test]
  fn offsets_outside_fields_are_dropped() {
    let (_, out) = remap_line("ab >< cd", &[0], &[
      Occurrence::new(3, 1),
      Occurrence::new(40, 1),
      Occurrence::new(6, 1),
    ]);
    assert_eq!(out, vec![Occurrence::new(6, 1)]);
  }

  #[test]
  fn match_running_into_folded_field_is_cut() {
    let line = "ab >< cd >< ef";
    let (text, out) = remap_line(line, &[1], &[Occurrence::new(1, 6)]);
    assert_eq!(text, "ab >< .. >< ef");
    assert_eq!(out, vec![Occurrence::new(1, 1)]);
    assert_eq!(&text[1..2], "b");
  }

  #[test]
  fn huge_length_is_cut_at_field_end() {
    let (_, out) = remap_line("ab >< cd", &[0], &[Occurrence::new(6, usize::MAX)]);
    assert_eq!(out, vec![Occurrence::new(6, 2)]);
  }

  #[test]
  fn end_does_not_overflow() {
    assert_eq!(Occurrence::new(3, 4).end(), Some(7));
    assert_eq!(Occurrence::new(usize::MAX, 1).end(), None);
  }

  quickcheck! {
    fn no_folding_is_identity(raw: Vec<(u8, u8)>) -> bool {
      let line = "one >< two >< three";
      let occurrences: Vec<Occurrence> = raw
        .into_iter()
        .map(|(o, l)| Occurrence::new(o as usize, l as usize))
        .collect();
      let sep = Separator::default();
      let spans = spans(line, &sep);
      remap(&spans, &spans, &occurrences, &FoldSpec::new(), FOLDED).as_ref() == occurrences.as_slice()
    }
  }
}
