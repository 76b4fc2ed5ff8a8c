//! Prompt templates.
//!
//! A template is text with `%<letter>` placeholders and optional style
//! markup (see [`crate::markup`]):
//!
//! | Placeholder | Expands to |
//! |-------------|------------|
//! | `%%` | a literal `%` |
//! | `%q` | the query; its start column is recorded for the caret |
//! | `%Q` | the query, without caret tracking |
//! | `%n` / `%N` | current page / total pages |
//! | `%i` / `%I` | 1-based selection index / result count |
//! | `%c` | caret position (chars) |
//! | `%k` | last key pressed |
//!
//! Any other letter expands to nothing. A `%` not followed by a letter or
//! `%` is literal text.
//!
//! Expansion is a single left-to-right pass that keeps the running display
//! width, so the caret column of `%q` accounts for everything drawn before it
//! in the same template.

use std::borrow::Cow;

use the_core::grapheme::screen_len;

use crate::{
  markup,
  page::PageGeometry,
  style::Style,
};

/// Left prompt used when nothing else is configured.
pub const DEFAULT_PROMPT: &str = "QUERY> %q";
/// Right prompt used when nothing else is configured.
pub const DEFAULT_RPROMPT: &str = "(%i/%I) [%n/%N]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
  Percent,
  Query,
  QueryNoCaret,
  Page,
  TotalPages,
  Index,
  Count,
  Caret,
  LastKey,
  Unknown(char),
}

impl Placeholder {
  pub const fn from_char(c: char) -> Self {
    match c {
      '%' => Self::Percent,
      'q' => Self::Query,
      'Q' => Self::QueryNoCaret,
      'n' => Self::Page,
      'N' => Self::TotalPages,
      'i' => Self::Index,
      'I' => Self::Count,
      'c' => Self::Caret,
      'k' => Self::LastKey,
      other => Self::Unknown(other),
    }
  }

  pub const fn as_char(&self) -> char {
    match self {
      Self::Percent => '%',
      Self::Query => 'q',
      Self::QueryNoCaret => 'Q',
      Self::Page => 'n',
      Self::TotalPages => 'N',
      Self::Index => 'i',
      Self::Count => 'I',
      Self::Caret => 'c',
      Self::LastKey => 'k',
      Self::Unknown(c) => *c,
    }
  }

  /// Text this placeholder stands for in `ctx`.
  pub fn resolve<'a>(&self, ctx: &PromptContext<'a>) -> Cow<'a, str> {
    match self {
      Self::Percent => Cow::Borrowed("%"),
      Self::Query | Self::QueryNoCaret => Cow::Borrowed(ctx.query),
      Self::Page => Cow::Owned(ctx.page.to_string()),
      Self::TotalPages => Cow::Owned(ctx.total_pages.to_string()),
      Self::Index => {
        let shown = ctx.index + usize::from(ctx.results_count > 0);
        Cow::Owned(shown.to_string())
      },
      Self::Count => Cow::Owned(ctx.results_count.to_string()),
      Self::Caret => Cow::Owned(ctx.caret.to_string()),
      Self::LastKey => Cow::Borrowed(ctx.last_key),
      Self::Unknown(_) => Cow::Borrowed(""),
    }
  }
}

/// Everything a placeholder may refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptContext<'a> {
  pub query:         &'a str,
  /// Caret position in chars.
  pub caret:         usize,
  pub index:         usize,
  pub results_count: usize,
  pub page:          usize,
  pub total_pages:   usize,
  pub last_key:      &'a str,
}

impl<'a> PromptContext<'a> {
  pub fn new(query: &'a str, caret: usize, page: &PageGeometry, last_key: &'a str) -> Self {
    Self {
      query,
      caret,
      index: page.index,
      results_count: page.results_count,
      page: page.page_number(),
      total_pages: page.total_pages(),
      last_key,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePart<'a> {
  Literal(&'a str),
  Placeholder(Placeholder),
}

/// Splits template text into literals and placeholders.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
  input: &'a str,
  pos:   usize,
}

impl<'a> Tokenizer<'a> {
  pub fn new(input: &'a str) -> Self {
    Self { input, pos: 0 }
  }

  /// Placeholder letter right after a `%` at byte `at`, if any.
  fn placeholder_at(&self, at: usize) -> Option<char> {
    debug_assert_eq!(self.input.as_bytes().get(at), Some(&b'%'));
    self.input[at + 1..]
      .chars()
      .next()
      .filter(|c| c.is_ascii_alphabetic() || *c == '%')
  }
}

impl<'a> Iterator for Tokenizer<'a> {
  type Item = TemplatePart<'a>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.pos >= self.input.len() {
      return None;
    }

    let start = self.pos;
    let mut search = start;
    while let Some(offset) = self.input[search..].find('%') {
      let at = search + offset;
      match self.placeholder_at(at) {
        Some(letter) if at == start => {
          self.pos = at + 2;
          return Some(TemplatePart::Placeholder(Placeholder::from_char(letter)));
        },
        // Emit the literal first, the placeholder comes next call.
        Some(_) => {
          self.pos = at;
          return Some(TemplatePart::Literal(&self.input[start..at]));
        },
        None => search = at + 1,
      }
    }

    self.pos = self.input.len();
    Some(TemplatePart::Literal(&self.input[start..]))
  }
}

pub fn parse_template(template: &str) -> Vec<TemplatePart<'_>> {
  Tokenizer::new(template).collect()
}

/// A resolved piece of prompt text with its style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptToken {
  pub text:  String,
  pub style: Style,
}

/// An expanded template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromptLine {
  pub tokens:       Vec<PromptToken>,
  /// Column of the query relative to the start of the line, when the
  /// template contains `%q`. With several `%q` the last one is tracked.
  pub query_column: Option<usize>,
}

impl PromptLine {
  pub fn width(&self) -> usize {
    self.tokens.iter().map(|token| screen_len(&token.text)).sum()
  }

  pub fn text(&self) -> String {
    self.tokens.iter().map(|token| token.text.as_str()).collect()
  }
}

/// Expands `template` against `ctx`; unstyled text uses `base`.
pub fn expand(template: &str, ctx: &PromptContext<'_>, base: Style) -> PromptLine {
  let mut line = PromptLine::default();
  let mut offset = 0;

  for segment in markup::parse(template, base) {
    let mut text = String::with_capacity(segment.text.len());
    for part in Tokenizer::new(segment.text) {
      match part {
        TemplatePart::Literal(literal) => text.push_str(literal),
        TemplatePart::Placeholder(placeholder) => {
          if placeholder == Placeholder::Query {
            line.query_column = Some(offset + screen_len(&text));
          }
          text.push_str(&placeholder.resolve(ctx));
        },
      }
    }
    offset += screen_len(&text);
    line.tokens.push(PromptToken {
      text,
      style: segment.style,
    });
  }
  line
}
