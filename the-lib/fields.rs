//! Field spans of a delimited line.
//!
//! A line such as `"a >< b >< c"` is split by a [`Separator`] into fields.
//! [`spans`] reports each field as a half-open byte range into the line. The
//! separator text itself belongs to no field.

use std::{
  fmt,
  sync::OnceLock,
};

use regex::Regex;
use smallvec::SmallVec;

use crate::error::SeparatorError;

/// Separator used when nothing else is configured.
pub const DEFAULT_SEPARATOR: &str = " >< ";

/// Half-open byte range `[start, end)` in some line's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
  pub start: usize,
  pub end:   usize,
}

impl Span {
  pub const fn new(start: usize, end: usize) -> Self {
    Self { start, end }
  }

  pub const fn len(&self) -> usize {
    self.end.saturating_sub(self.start)
  }

  pub const fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Whether `offset` lies inside the span. An empty span contains its own
  /// start so that empty fields can still be located.
  pub const fn contains(&self, offset: usize) -> bool {
    (offset >= self.start && offset < self.end) || (self.is_empty() && offset == self.start)
  }
}

pub type Spans = SmallVec<[Span; 8]>;

/// Compiled field separator.
#[derive(Clone)]
pub struct Separator {
  regex: Regex,
}

impl Separator {
  /// Separator matching `text` literally.
  pub fn literal(text: &str) -> Result<Self, SeparatorError> {
    Self::compile(&regex::escape(text), text)
  }

  /// Separator matching the regular expression `pattern`.
  pub fn pattern(pattern: &str) -> Result<Self, SeparatorError> {
    Self::compile(pattern, pattern)
  }

  fn compile(source: &str, shown: &str) -> Result<Self, SeparatorError> {
    let regex = Regex::new(source).map_err(|source| {
      SeparatorError::Invalid {
        pattern: shown.to_string(),
        source,
      }
    })?;
    // An empty match would split the line between every character.
    if regex.is_match("") {
      return Err(SeparatorError::MatchesEmpty {
        pattern: shown.to_string(),
      });
    }
    Ok(Self { regex })
  }

  pub fn as_str(&self) -> &str {
    self.regex.as_str()
  }

  pub(crate) fn regex(&self) -> &Regex {
    &self.regex
  }
}

impl Default for Separator {
  fn default() -> Self {
    static DEFAULT_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DEFAULT_REGEX.get_or_init(|| Regex::new(&regex::escape(DEFAULT_SEPARATOR)).unwrap());
    Self {
      regex: regex.clone(),
    }
  }
}

impl fmt::Debug for Separator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Separator").field(&self.regex.as_str()).finish()
  }
}

impl PartialEq for Separator {
  fn eq(&self, other: &Self) -> bool {
    self.regex.as_str() == other.regex.as_str()
  }
}

/// Splits `line` into field spans.
///
/// The first span starts at 0 and the last one ends at `line.len()`; a line
/// without any separator is a single field. Each span ends exactly where the
/// following separator match begins.
pub fn spans(line: &str, sep: &Separator) -> Spans {
  let mut spans = Spans::new();
  let mut last_end = 0;
  for m in sep.regex().find_iter(line) {
    spans.push(Span::new(last_end, m.start()));
    last_end = m.end();
  }
  spans.push(Span::new(last_end, line.len()));
  spans
}

/// Number of fields in `line`.
pub fn field_count(line: &str, sep: &Separator) -> usize {
  sep.regex().find_iter(line).count() + 1
}

/// Index of the field containing `offset`, if any.
pub fn field_at(spans: &[Span], offset: usize) -> Option<usize> {
  spans.iter().position(|span| span.contains(offset))
}
