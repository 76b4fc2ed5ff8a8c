//! Inline style markup for prompt templates.
//!
//! `<name>` opens and `</name>` closes a style attribute, where `name` is any
//! attribute understood by [`Attr::parse`]: `"<bold><red>QUERY</red></bold>>
//! %q"`. Anything that is not a well-formed tag with a known name, such as the
//! `>` in `QUERY>`, is plain text. Unclosed tags run to the end of the
//! template. Inner tags take precedence over outer ones.

use crate::style::{
  Attr,
  Style,
};

/// A run of template text sharing one style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
  pub text:  &'a str,
  pub style: Style,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag<'a> {
  Open(&'a str, Attr),
  Close(&'a str),
}

/// Parses a tag starting at `input[0] == '<'`. Returns the tag and its byte
/// length.
fn parse_tag(input: &str) -> Option<(Tag<'_>, usize)> {
  debug_assert!(input.starts_with('<'));
  let end = input.find('>')?;
  let inner = &input[1..end];
  let tag = match inner.strip_prefix('/') {
    Some(name) => {
      Attr::parse(name)?;
      Tag::Close(name)
    },
    None => Tag::Open(inner, Attr::parse(inner)?),
  };
  Some((tag, end + 1))
}

fn stack_style(base: Style, stack: &[(&str, Attr)]) -> Style {
  let mut style = Style::new();
  for (_, attr) in stack.iter().rev() {
    style.apply(*attr);
  }
  base.patch(style)
}

/// Splits `template` into styled segments, each drawn over `base`.
pub fn parse(template: &str, base: Style) -> Vec<Segment<'_>> {
  let mut segments = Vec::new();
  let mut stack: Vec<(&str, Attr)> = Vec::new();
  let mut text_start = 0;
  let mut pos = 0;

  while let Some(offset) = template[pos..].find('<') {
    let tag_start = pos + offset;
    let Some((tag, len)) = parse_tag(&template[tag_start..]) else {
      pos = tag_start + 1;
      continue;
    };

    let applied = match tag {
      Tag::Open(name, attr) => {
        flush(&mut segments, &template[text_start..tag_start], base, &stack);
        stack.push((name, attr));
        true
      },
      Tag::Close(name) => {
        match stack.iter().rposition(|(open, _)| *open == name) {
          Some(idx) => {
            flush(&mut segments, &template[text_start..tag_start], base, &stack);
            stack.remove(idx);
            true
          },
          // A stray close tag is text.
          None => false,
        }
      },
    };

    pos = tag_start + len;
    if applied {
      text_start = pos;
    }
  }
  flush(&mut segments, &template[text_start..], base, &stack);
  segments
}

fn flush<'a>(segments: &mut Vec<Segment<'a>>, text: &'a str, base: Style, stack: &[(&str, Attr)]) {
  if !text.is_empty() {
    segments.push(Segment {
      text,
      style: stack_style(base, stack),
    });
  }
}
