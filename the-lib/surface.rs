//! Drawing surfaces.
//!
//! A [`Surface`] is a grid of terminal cells addressed by `(row, col)`. The
//! frame composer only talks to this trait; the binary implements it over
//! crossterm and [`GridSurface`] keeps the cells in memory.

use std::collections::HashSet;

use the_core::grapheme::{
  graphemes_with_width,
  screen_len,
};

use crate::{
  error::{
    DrawError,
    Result,
  },
  prompt::PromptToken,
  style::Style,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XAlign {
  #[default]
  Left,
  Right,
  Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YAlign {
  #[default]
  Top,
  Bottom,
  Center,
}

pub trait Surface {
  /// `(width, height)` in cells.
  fn size(&self) -> (usize, usize);

  fn erase(&mut self) -> Result<()>;

  /// Writes `text` starting at `(row, col)`, clipped to `max_width` columns
  /// and to the right edge. Returns the number of columns written.
  fn put_str(
    &mut self,
    row: usize,
    col: usize,
    text: &str,
    style: Style,
    max_width: Option<usize>,
  ) -> Result<usize>;

  /// Paints `width` blank cells with `style`, clipped to the right edge.
  fn fill(&mut self, row: usize, col: usize, width: usize, style: Style) -> Result<()>;

  fn move_cursor(&mut self, row: usize, col: usize) -> Result<()>;

  fn hide_cursor(&mut self) -> Result<()>;

  fn flush(&mut self) -> Result<()>;

  fn width(&self) -> usize {
    self.size().0
  }

  fn height(&self) -> usize {
    self.size().1
  }

  /// First usable row.
  fn y_begin(&self) -> usize {
    0
  }

  /// Last usable row.
  fn y_end(&self) -> usize {
    self.height().saturating_sub(1)
  }

  /// Fails with [`DrawError::OutOfBounds`] unless `(row, col)` is a cell.
  fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
    let (width, height) = self.size();
    if row >= height || col >= width {
      return Err(DrawError::OutOfBounds {
        row,
        col,
        width,
        height,
      });
    }
    Ok(())
  }

  /// Column at which a run of `len` columns starts for `align`.
  fn pos_x(&self, align: XAlign, x_offset: usize, len: usize) -> usize {
    let width = self.width();
    match align {
      XAlign::Left => x_offset,
      XAlign::Right => width.saturating_sub(len + x_offset),
      XAlign::Center => width.saturating_sub(len) / 2 + x_offset,
    }
  }

  /// Row for `align`; bottom alignment counts `y_offset` up from the last
  /// row.
  fn pos_y(&self, align: YAlign, y_offset: usize) -> usize {
    match align {
      YAlign::Top => y_offset,
      YAlign::Bottom => self.y_end().saturating_sub(y_offset),
      YAlign::Center => self.height() / 2 + y_offset,
    }
  }

  /// Writes `text` at an aligned position, optionally painting the rest of
  /// the row with `style`. Returns the `(row, col)` the text starts at.
  fn put_aligned(
    &mut self,
    text: &str,
    style: Style,
    y_offset: usize,
    x_offset: usize,
    y_align: YAlign,
    x_align: XAlign,
    fill: bool,
  ) -> Result<(usize, usize)> {
    let row = self.pos_y(y_align, y_offset);
    let col = self.pos_x(x_align, x_offset, screen_len(text));
    let written = if text.is_empty() {
      self.check_bounds(row, col)?;
      0
    } else {
      self.put_str(row, col, text, style, None)?
    };
    if fill {
      let start = col + written;
      let rest = self.width().saturating_sub(start);
      if rest > 0 {
        self.fill(row, start, rest, style)?;
      }
    }
    Ok((row, col))
  }

  /// Writes styled tokens one after another as a single aligned run.
  /// Returns the `(row, col)` of the first token.
  fn put_tokens_aligned(
    &mut self,
    tokens: &[PromptToken],
    y_offset: usize,
    x_offset: usize,
    y_align: YAlign,
    x_align: XAlign,
  ) -> Result<(usize, usize)> {
    let len = tokens.iter().map(|token| screen_len(&token.text)).sum();
    let row = self.pos_y(y_align, y_offset);
    let start = self.pos_x(x_align, x_offset, len);
    self.check_bounds(row, start)?;

    let mut col = start;
    for token in tokens {
      if token.text.is_empty() {
        continue;
      }
      if col >= self.width() {
        break;
      }
      col += self.put_str(row, col, &token.text, token.style, None)?;
    }
    Ok((row, start))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
  /// Grapheme drawn in the cell; empty for the trailing half of a wide
  /// grapheme.
  pub symbol: String,
  pub style:  Style,
}

impl Cell {
  fn blank(style: Style) -> Self {
    Self {
      symbol: " ".to_string(),
      style,
    }
  }
}

/// Surface backed by an in-memory cell grid.
#[derive(Debug, Clone)]
pub struct GridSurface {
  width:      usize,
  height:     usize,
  cells:      Vec<Cell>,
  cursor:     Option<(usize, usize)>,
  flushes:    usize,
  fail_rows:  HashSet<usize>,
  fail_flush: bool,
}

impl GridSurface {
  pub fn new(width: usize, height: usize) -> Self {
    Self {
      width,
      height,
      cells: vec![Cell::blank(Style::new()); width * height],
      cursor: None,
      flushes: 0,
      fail_rows: HashSet::new(),
      fail_flush: false,
    }
  }

  pub fn resize(&mut self, width: usize, height: usize) {
    *self = Self {
      fail_rows: std::mem::take(&mut self.fail_rows),
      fail_flush: self.fail_flush,
      ..Self::new(width, height)
    };
  }

  /// Makes every later write to `row` fail with [`DrawError::Io`].
  pub fn fail_writes_on(&mut self, row: usize) {
    self.fail_rows.insert(row);
  }

  pub fn fail_flush(&mut self, fail: bool) {
    self.fail_flush = fail;
  }

  pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
    if row < self.height && col < self.width {
      self.cells.get(row * self.width + col)
    } else {
      None
    }
  }

  pub fn style_at(&self, row: usize, col: usize) -> Option<Style> {
    self.cell(row, col).map(|cell| cell.style)
  }

  /// Text of `row` with trailing blanks removed.
  pub fn row_text(&self, row: usize) -> String {
    if row >= self.height {
      return String::new();
    }
    let cells = &self.cells[row * self.width..(row + 1) * self.width];
    let text: String = cells.iter().map(|cell| cell.symbol.as_str()).collect();
    text.trim_end().to_string()
  }

  /// Every row's text, top to bottom.
  pub fn rows(&self) -> Vec<String> {
    (0..self.height).map(|row| self.row_text(row)).collect()
  }

  /// Cursor position, `None` while hidden.
  pub fn cursor(&self) -> Option<(usize, usize)> {
    self.cursor
  }

  pub fn flush_count(&self) -> usize {
    self.flushes
  }

  fn check_row(&self, row: usize, col: usize) -> Result<()> {
    self.check_bounds(row, col)?;
    if self.fail_rows.contains(&row) {
      return Err(DrawError::Io(format!("write to row {row} rejected")));
    }
    Ok(())
  }

  fn set(&mut self, row: usize, col: usize, symbol: &str, style: Style) {
    let idx = row * self.width + col;
    self.cells[idx] = Cell {
      symbol: symbol.to_string(),
      style,
    };
  }
}

impl Surface for GridSurface {
  fn size(&self) -> (usize, usize) {
    (self.width, self.height)
  }

  fn erase(&mut self) -> Result<()> {
    self.cells.fill(Cell::blank(Style::new()));
    Ok(())
  }

  fn put_str(
    &mut self,
    row: usize,
    col: usize,
    text: &str,
    style: Style,
    max_width: Option<usize>,
  ) -> Result<usize> {
    self.check_row(row, col)?;
    let limit = max_width.map_or(self.width, |max| self.width.min(col + max));

    let mut x = col;
    for (_, grapheme, width) in graphemes_with_width(text) {
      if x + width > limit {
        break;
      }
      self.set(row, x, grapheme, style);
      for pad in 1..width {
        self.set(row, x + pad, "", style);
      }
      x += width;
    }
    Ok(x - col)
  }

  fn fill(&mut self, row: usize, col: usize, width: usize, style: Style) -> Result<()> {
    self.check_row(row, col)?;
    let end = self.width.min(col + width);
    for x in col..end {
      self.set(row, x, " ", style);
    }
    Ok(())
  }

  fn move_cursor(&mut self, row: usize, col: usize) -> Result<()> {
    self.check_bounds(row, col)?;
    self.cursor = Some((row, col));
    Ok(())
  }

  fn hide_cursor(&mut self) -> Result<()> {
    self.cursor = None;
    Ok(())
  }

  fn flush(&mut self) -> Result<()> {
    if self.fail_flush {
      return Err(DrawError::Io("flush rejected".to_string()));
    }
    self.flushes += 1;
    Ok(())
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::style::Color;

  fn token(text: &str) -> PromptToken {
    PromptToken {
      text:  text.to_string(),
      style: Style::new(),
    }
  }

  #[test]
  fn put_str_clips_to_width() {
    let mut surface = GridSurface::new(5, 2);
    assert_eq!(surface.put_str(0, 2, "abcdef", Style::new(), None), Ok(3));
    assert_eq!(surface.row_text(0), "  abc");
    assert_eq!(surface.put_str(1, 0, "abcdef", Style::new(), Some(2)), Ok(2));
    assert_eq!(surface.row_text(1), "ab");
  }

  #[test]
  fn wide_graphemes_take_two_cells() {
    let mut surface = GridSurface::new(5, 1);
    assert_eq!(surface.put_str(0, 0, "日本語", Style::new(), None), Ok(4));
    assert_eq!(surface.row_text(0), "日本");
    assert_eq!(surface.cell(0, 1).map(|c| c.symbol.as_str()), Some(""));
  }

  #[test]
  fn out_of_bounds_writes_fail() {
    let mut surface = GridSurface::new(4, 2);
    assert_eq!(
      surface.put_str(2, 0, "x", Style::new(), None),
      Err(DrawError::OutOfBounds {
        row:    2,
        col:    0,
        width:  4,
        height: 2,
      })
    );
    assert!(surface.fill(0, 4, 1, Style::new()).is_err());
    assert!(surface.move_cursor(0, 9).is_err());
  }

  #[test]
  fn aligned_fill_paints_the_row() {
    let mut surface = GridSurface::new(6, 1);
    let style = Style::new().bg(Color::Red);
    let pos = surface.put_aligned("ab", style, 0, 0, YAlign::Top, XAlign::Left, true);
    assert_eq!(pos, Ok((0, 0)));
    assert_eq!(surface.style_at(0, 5), Some(style));
  }

  #[test]
  fn right_aligned_tokens() {
    let mut surface = GridSurface::new(10, 3);
    let pos = surface.put_tokens_aligned(
      &[token("(1/"), token("2)")],
      0,
      0,
      YAlign::Bottom,
      XAlign::Right,
    );
    assert_eq!(pos, Ok((2, 5)));
    assert_eq!(surface.row_text(2), "     (1/2)");
  }

  #[test]
  fn centered_position() {
    let surface = GridSurface::new(10, 4);
    assert_eq!(surface.pos_x(XAlign::Center, 1, 4), 4);
    assert_eq!(surface.pos_y(YAlign::Center, 0), 2);
    assert_eq!(surface.y_end(), 3);
  }

  #[test]
  fn injected_failures() {
    let mut surface = GridSurface::new(4, 2);
    surface.fail_writes_on(1);
    assert!(matches!(
      surface.put_str(1, 0, "x", Style::new(), None),
      Err(DrawError::Io(_))
    ));
    assert_eq!(surface.put_str(0, 0, "x", Style::new(), None), Ok(1));
    surface.fail_flush(true);
    assert!(surface.flush().is_err());
  }
}
