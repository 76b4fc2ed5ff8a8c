use the_core::grapheme::screen_len_between;

use crate::{
  error::Result,
  fields,
  fold::fold,
  model::Candidate,
  remap::remap,
  render::RenderConfig,
  style::{
    Style,
    Theme,
  },
  surface::{
    Surface,
    XAlign,
    YAlign,
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowState {
  pub current: bool,
  pub marked:  bool,
}

impl RowState {
  /// Style of the whole row. The selection wins over a mark.
  pub fn line_style(&self, theme: &Theme) -> Style {
    if self.current {
      theme.selected
    } else if self.marked {
      theme.marked
    } else {
      theme.basic
    }
  }
}

/// Draws one result on `row`: the folded line across the full width, then
/// every sub-query hit highlighted in place.
///
/// Only the base line can fail the call. A highlight that cannot be drawn is
/// logged and skipped.
pub fn render_result<S: Surface + ?Sized>(
  surface: &mut S,
  row: usize,
  candidate: &Candidate<'_>,
  state: RowState,
  config: &RenderConfig,
) -> Result<()> {
  let base = state.line_style(&config.theme);
  let line = candidate.line.as_ref();
  let folded = fold(line, &config.separator, &config.fold, &config.placeholder);
  surface.put_aligned(
    folded.as_str(),
    base,
    row,
    0,
    YAlign::Top,
    XAlign::Left,
    true,
  )?;

  let Some(matches) = &candidate.matches else {
    return Ok(());
  };

  let keyword = base.patch(config.theme.query);
  let original = if folded.is_folded() {
    fields::spans(line, &config.separator)
  } else {
    folded.spans.clone()
  };
  let text = folded.as_str();

  for subquery in matches.iter() {
    let occurrences = remap(
      &original,
      &folded.spans,
      &subquery.occurrences,
      &config.fold,
      &config.placeholder,
    );
    for occurrence in occurrences.iter().filter(|o| o.len > 0) {
      let (Some(slice), Some(col)) = (
        occurrence
          .end()
          .and_then(|end| text.get(occurrence.offset..end)),
        screen_len_between(text, 0, occurrence.offset),
      ) else {
        log::trace!(
          "'{}' hit {occurrence:?} does not fit line {}",
          subquery.subquery,
          candidate.index
        );
        continue;
      };
      if col >= surface.width() {
        continue;
      }
      if let Err(err) = surface.put_str(row, col, slice, keyword, None) {
        log::debug!("highlight on row {row} failed: {err}");
      }
    }
  }
  Ok(())
}
