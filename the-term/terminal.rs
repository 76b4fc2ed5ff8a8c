//! Crossterm drawing surface over stderr.
//!
//! Stdout is kept free for the chosen lines, so the whole interface is drawn
//! on stderr.

use std::io::{
  self,
  BufWriter,
  Stderr,
  Write,
};

use crossterm::{
  cursor::{
    Hide,
    MoveTo,
    Show,
  },
  execute,
  queue,
  style::{
    Attribute,
    Print,
    SetAttribute,
    SetStyle,
  },
  terminal::{
    self,
    Clear,
    ClearType,
    EnterAlternateScreen,
    LeaveAlternateScreen,
    disable_raw_mode,
    enable_raw_mode,
  },
};
use eyre::Result;
use the_core::grapheme::truncate_to_width;
use the_lib::{
  error::Result as DrawResult,
  style::Style,
  surface::Surface,
};

use crate::theme::to_content_style;

pub struct Terminal {
  out:    BufWriter<Stderr>,
  width:  usize,
  height: usize,
  raw:    bool,
}

impl Terminal {
  pub fn new() -> Result<Self> {
    let (width, height) = terminal::size()?;
    Ok(Self {
      out:    BufWriter::new(io::stderr()),
      width:  width.into(),
      height: height.into(),
      raw:    false,
    })
  }

  pub fn enter_raw_mode(&mut self) -> Result<()> {
    enable_raw_mode()?;
    execute!(self.out, EnterAlternateScreen)?;
    self.raw = true;
    Ok(())
  }

  pub fn leave_raw_mode(&mut self) -> Result<()> {
    if !self.raw {
      return Ok(());
    }
    execute!(self.out, Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    self.raw = false;
    Ok(())
  }

  pub fn resize(&mut self, width: u16, height: u16) {
    self.width = width.into();
    self.height = height.into();
  }

  fn start(&mut self, row: usize, col: usize, style: Style) -> DrawResult<()> {
    self.check_bounds(row, col)?;
    queue!(
      self.out,
      MoveTo(to_u16(col), to_u16(row)),
      SetAttribute(Attribute::Reset),
      SetStyle(to_content_style(style))
    )?;
    Ok(())
  }
}

fn to_u16(n: usize) -> u16 {
  u16::try_from(n).unwrap_or(u16::MAX)
}

impl Drop for Terminal {
  fn drop(&mut self) {
    if let Err(err) = self.leave_raw_mode() {
      log::error!("failed to restore the terminal: {err}");
    }
  }
}

impl Surface for Terminal {
  fn size(&self) -> (usize, usize) {
    (self.width, self.height)
  }

  fn erase(&mut self) -> DrawResult<()> {
    queue!(self.out, SetAttribute(Attribute::Reset), Clear(ClearType::All))?;
    Ok(())
  }

  fn put_str(
    &mut self,
    row: usize,
    col: usize,
    text: &str,
    style: Style,
    max_width: Option<usize>,
  ) -> DrawResult<usize> {
    self.start(row, col, style)?;
    let room = self.width - col;
    let room = max_width.map_or(room, |max| room.min(max));
    let (text, written) = truncate_to_width(text, room);
    queue!(self.out, Print(text))?;
    Ok(written)
  }

  fn fill(&mut self, row: usize, col: usize, width: usize, style: Style) -> DrawResult<()> {
    self.start(row, col, style)?;
    let width = width.min(self.width - col);
    queue!(self.out, Print(" ".repeat(width)))?;
    Ok(())
  }

  fn move_cursor(&mut self, row: usize, col: usize) -> DrawResult<()> {
    self.check_bounds(row, col)?;
    queue!(self.out, MoveTo(to_u16(col), to_u16(row)), Show)?;
    Ok(())
  }

  fn hide_cursor(&mut self) -> DrawResult<()> {
    queue!(self.out, Hide)?;
    Ok(())
  }

  fn flush(&mut self) -> DrawResult<()> {
    queue!(self.out, SetAttribute(Attribute::Reset))?;
    self.out.flush()?;
    Ok(())
  }
}
