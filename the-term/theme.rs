//! Conversion of picker styles to crossterm styles.

use crossterm::style::{
  Attribute,
  Attributes,
  Color,
  ContentStyle,
};
use the_lib::style::{
  Color as PickerColor,
  Modifier,
  Style,
};

pub fn to_color(color: PickerColor) -> Color {
  match color {
    PickerColor::Default => Color::Reset,
    PickerColor::Black => Color::Black,
    PickerColor::Red => Color::DarkRed,
    PickerColor::Green => Color::DarkGreen,
    PickerColor::Yellow => Color::DarkYellow,
    PickerColor::Blue => Color::DarkBlue,
    PickerColor::Magenta => Color::DarkMagenta,
    PickerColor::Cyan => Color::DarkCyan,
    PickerColor::White => Color::Grey,
  }
}

const MODIFIERS: &[(Modifier, Attribute)] = &[
  (Modifier::BOLD, Attribute::Bold),
  (Modifier::DIM, Attribute::Dim),
  (Modifier::ITALIC, Attribute::Italic),
  (Modifier::UNDERLINE, Attribute::Underlined),
  (Modifier::BLINK, Attribute::SlowBlink),
  (Modifier::REVERSE, Attribute::Reverse),
];

/// Full terminal style for `style`. Unset colors become the terminal default
/// so nothing leaks over from the previous write.
pub fn to_content_style(style: Style) -> ContentStyle {
  let mut attributes = Attributes::default();
  for &(modifier, attribute) in MODIFIERS {
    if style.modifiers.contains(modifier) {
      attributes.set(attribute);
    }
  }
  ContentStyle {
    foreground_color: Some(style.fg.map_or(Color::Reset, to_color)),
    background_color: Some(style.bg.map_or(Color::Reset, to_color)),
    underline_color: None,
    attributes,
  }
}
