use crate::{
  fields::Separator,
  fold::{
    FOLDED,
    FoldSpec,
  },
  prompt::{
    DEFAULT_PROMPT,
    DEFAULT_RPROMPT,
  },
  style::Theme,
};

/// Header drawn above the command stack.
pub const STACKLINE: &str = "========= Command Stack =========";

/// Label of the stack-name prompt, drawn right of [`STACKLINE`].
pub const STACK_NAME_LABEL: &str = " name> ";

/// Widest stack name the prompt shows.
pub const STACK_NAME_WIDTH: usize = 40;

/// Settings that persist across refreshes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
  pub fold:             FoldSpec,
  pub separator:        Separator,
  /// Text drawn in place of a folded field.
  pub placeholder:      String,
  /// Draw results downwards from the top instead of upwards from the bottom.
  pub results_top_down: bool,
  pub prompt_on_top:    bool,
  pub prompt:           String,
  /// Right-aligned prompt on the same row as `prompt`.
  pub rprompt:          String,
  pub theme:            Theme,
}

impl Default for RenderConfig {
  fn default() -> Self {
    Self {
      fold:             FoldSpec::new(),
      separator:        Separator::default(),
      placeholder:      FOLDED.to_string(),
      results_top_down: true,
      prompt_on_top:    true,
      prompt:           DEFAULT_PROMPT.to_string(),
      rprompt:          DEFAULT_RPROMPT.to_string(),
      theme:            Theme::default(),
    }
  }
}

impl RenderConfig {
  /// Row of the first result. Results then run down or up from here.
  pub fn results_offset_v(&self, y_begin: usize, y_end: usize) -> usize {
    match (self.results_top_down, self.prompt_on_top) {
      (true, true) => y_begin + 1,
      (true, false) => y_begin,
      (false, true) => y_end,
      (false, false) => y_end.saturating_sub(1),
    }
  }

  pub fn prompt_offset_v(&self, y_begin: usize, y_end: usize) -> usize {
    if self.prompt_on_top { y_begin } else { y_end }
  }

  /// `offset` rows away from `origin` in the direction results run, or
  /// `None` above the top of the screen.
  pub fn step(&self, origin: usize, offset: usize) -> Option<usize> {
    if self.results_top_down {
      origin.checked_add(offset)
    } else {
      origin.checked_sub(offset)
    }
  }
}
