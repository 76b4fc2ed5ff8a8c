//! Field folding: collapsing selected fields of a line into a placeholder.

use std::{
  borrow::Cow,
  collections::BTreeSet,
};

use serde::Deserialize;

use crate::fields::{
  self,
  Separator,
  Span,
  Spans,
};

/// Text drawn in place of a folded field.
pub const FOLDED: &str = "..";

/// Set of zero-based field indices to collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FoldSpec {
  fields: BTreeSet<usize>,
}

impl FoldSpec {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn contains(&self, field: usize) -> bool {
    self.fields.contains(&field)
  }

  pub fn insert(&mut self, field: usize) -> bool {
    self.fields.insert(field)
  }

  pub fn remove(&mut self, field: usize) -> bool {
    self.fields.remove(&field)
  }

  /// Folds `field` if it is unfolded and unfolds it otherwise.
  pub fn toggle(&mut self, field: usize) {
    if !self.fields.remove(&field) {
      self.fields.insert(field);
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
    self.fields.iter().copied()
  }
}

impl FromIterator<usize> for FoldSpec {
  fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
    Self {
      fields: iter.into_iter().collect(),
    }
  }
}

/// A line after folding, together with the spans of its fields in the folded
/// text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedLine<'a> {
  pub text:  Cow<'a, str>,
  pub spans: Spans,
}

impl FoldedLine<'_> {
  pub fn as_str(&self) -> &str {
    &self.text
  }

  pub fn is_folded(&self) -> bool {
    matches!(self.text, Cow::Owned(_))
  }
}

/// Folds every field of `line` listed in `spec` into `placeholder`.
///
/// Separators are kept verbatim, exactly once between consecutive fields;
/// the last field has no trailing separator. An empty `spec` returns the line
/// borrowed and unchanged.
pub fn fold<'a>(
  line: &'a str,
  sep: &Separator,
  spec: &FoldSpec,
  placeholder: &str,
) -> FoldedLine<'a> {
  if spec.is_empty() {
    return FoldedLine {
      text:  Cow::Borrowed(line),
      spans: fields::spans(line, sep),
    };
  }

  let mut text = String::with_capacity(line.len());
  let mut spans = Spans::new();
  let mut push_field = |text: &mut String, field: &str, index: usize| {
    let start = text.len();
    if spec.contains(index) {
      text.push_str(placeholder);
    } else {
      text.push_str(field);
    }
    spans.push(Span::new(start, text.len()));
  };

  let mut last_end = 0;
  let mut index = 0;
  for m in sep.regex().find_iter(line) {
    push_field(&mut text, &line[last_end..m.start()], index);
    text.push_str(m.as_str());
    last_end = m.end();
    index += 1;
  }
  push_field(&mut text, &line[last_end..], index);

  FoldedLine {
    text: Cow::Owned(text),
    spans,
  }
}

/// Folded text only; see [`fold`].
pub fn fold_line<'a>(
  line: &'a str,
  sep: &Separator,
  spec: &FoldSpec,
  placeholder: &str,
) -> Cow<'a, str> {
  fold(line, sep, spec, placeholder).text
}
