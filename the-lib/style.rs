//! Terminal styles built from attribute names.
//!
//! Styles are written as lists of names, e.g. `["underline", "on_magenta",
//! "white"]`: a plain color name sets the foreground, `on_<color>` the
//! background, anything else must be a modifier.

use bitflags::bitflags;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
  /// The terminal's own default color.
  Default,
  Black,
  Red,
  Green,
  Yellow,
  Blue,
  Magenta,
  Cyan,
  White,
}

impl Color {
  pub fn from_name(name: &str) -> Option<Self> {
    Some(match name {
      "default" => Self::Default,
      "black" => Self::Black,
      "red" => Self::Red,
      "green" => Self::Green,
      "yellow" => Self::Yellow,
      "blue" => Self::Blue,
      "magenta" => Self::Magenta,
      "cyan" => Self::Cyan,
      "white" => Self::White,
      _ => return None,
    })
  }
}

bitflags! {
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
  pub struct Modifier: u8 {
    const BOLD      = 1 << 0;
    const DIM       = 1 << 1;
    const ITALIC    = 1 << 2;
    const UNDERLINE = 1 << 3;
    const BLINK     = 1 << 4;
    const REVERSE   = 1 << 5;
  }
}

impl Modifier {
  /// Looks up a lowercase attribute name such as `bold`.
  pub fn parse_name(name: &str) -> Option<Self> {
    Some(match name {
      "bold" => Self::BOLD,
      "dim" => Self::DIM,
      "italic" => Self::ITALIC,
      "underline" => Self::UNDERLINE,
      "blink" => Self::BLINK,
      "reverse" => Self::REVERSE,
      _ => return None,
    })
  }
}

/// A single parsed attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
  Fg(Color),
  Bg(Color),
  Modifier(Modifier),
}

impl Attr {
  pub fn parse(name: &str) -> Option<Self> {
    if let Some(color) = name.strip_prefix("on_") {
      return Color::from_name(color).map(Self::Bg);
    }
    Color::from_name(name)
      .map(Self::Fg)
      .or_else(|| Modifier::parse_name(name).map(Self::Modifier))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct Style {
  pub fg:        Option<Color>,
  pub bg:        Option<Color>,
  pub modifiers: Modifier,
}

impl Style {
  pub const fn new() -> Self {
    Self {
      fg:        None,
      bg:        None,
      modifiers: Modifier::empty(),
    }
  }

  pub const fn fg(mut self, color: Color) -> Self {
    self.fg = Some(color);
    self
  }

  pub const fn bg(mut self, color: Color) -> Self {
    self.bg = Some(color);
    self
  }

  pub const fn add_modifier(mut self, modifier: Modifier) -> Self {
    self.modifiers = self.modifiers.union(modifier);
    self
  }

  /// Applies one attribute. The first color set for a channel wins, so
  /// `["yellow", "white"]` is yellow.
  pub fn apply(&mut self, attr: Attr) {
    match attr {
      Attr::Fg(color) => {
        self.fg.get_or_insert(color);
      },
      Attr::Bg(color) => {
        self.bg.get_or_insert(color);
      },
      Attr::Modifier(modifier) => self.modifiers |= modifier,
    }
  }

  /// Builds a style from attribute names; unknown names are logged and
  /// ignored.
  pub fn from_attrs<S: AsRef<str>>(attrs: impl IntoIterator<Item = S>) -> Self {
    let mut style = Self::new();
    for name in attrs {
      let name = name.as_ref();
      match Attr::parse(name) {
        Some(attr) => style.apply(attr),
        None => log::warn!("ignoring unknown style attribute '{name}'"),
      }
    }
    style
  }

  /// Lays `other` over `self`: colors set in `other` win, modifiers are
  /// combined.
  pub fn patch(self, other: Self) -> Self {
    Self {
      fg:        other.fg.or(self.fg),
      bg:        other.bg.or(self.bg),
      modifiers: self.modifiers | other.modifiers,
    }
  }
}

impl From<Vec<String>> for Style {
  fn from(attrs: Vec<String>) -> Self {
    Self::from_attrs(attrs)
  }
}

/// Styles used by the result list and the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
  /// Plain result rows and the prompt.
  pub basic:    Style,
  /// The selected result row.
  pub selected: Style,
  /// Marked result rows.
  pub marked:   Style,
  /// Sub-query hits, drawn over the row's own style.
  pub query:    Style,
  /// The in-place error banner.
  pub error:    Style,
}

impl Default for Theme {
  fn default() -> Self {
    Self {
      basic:    Style::new().bg(Color::Default).fg(Color::Default),
      selected: Style::new()
        .add_modifier(Modifier::UNDERLINE)
        .bg(Color::Magenta)
        .fg(Color::White),
      marked:   Style::new()
        .add_modifier(Modifier::BOLD)
        .bg(Color::Cyan)
        .fg(Color::Black),
      query:    Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
      error:    Style::new().bg(Color::Red).fg(Color::White),
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn attrs_build_styles() {
    let style = Style::from_attrs(["underline", "on_magenta", "white"]);
    assert_eq!(style, Theme::default().selected);
    assert_eq!(Style::from_attrs(["bogus"]), Style::new());
  }

  #[test]
  fn first_color_wins_within_attrs() {
    let style = Style::from_attrs(["yellow", "bold", "white", "on_red", "on_blue"]);
    assert_eq!(style.fg, Some(Color::Yellow));
    assert_eq!(style.bg, Some(Color::Red));
    assert_eq!(style.modifiers, Modifier::BOLD);
  }

  #[test]
  fn query_over_selected_keeps_row_background() {
    let theme = Theme::default();
    let style = theme.selected.patch(theme.query);
    assert_eq!(style.fg, Some(Color::Yellow));
    assert_eq!(style.bg, Some(Color::Magenta));
    assert_eq!(style.modifiers, Modifier::BOLD | Modifier::UNDERLINE);
  }

  #[test]
  fn modifier_names_are_lowercase() {
    assert_eq!(Modifier::parse_name("underline"), Some(Modifier::UNDERLINE));
    assert_eq!(Modifier::parse_name("UNDERLINE"), None);
  }

  #[test]
  fn attr_parsing() {
    assert_eq!(Attr::parse("on_default"), Some(Attr::Bg(Color::Default)));
    assert_eq!(Attr::parse("reverse"), Some(Attr::Modifier(Modifier::REVERSE)));
    assert_eq!(Attr::parse("on_bold"), None);
  }
}
