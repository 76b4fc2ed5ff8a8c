//! Frame composition.
//!
//! One refresh copies a [`FrameSnapshot`] out of the locked model and then
//! draws, in order: the page of results, the command stack, the right and
//! left prompts, the stack-name prompt when it is active, and the caret. The
//! model lock is released before the first write to the surface.

use parking_lot::Mutex;
use the_core::grapheme::{
  screen_len,
  width_until_char,
};

use crate::{
  error::{
    DrawError,
    RenderError,
  },
  model::{
    FrameSnapshot,
    ResultModel,
  },
  prompt::{
    PromptContext,
    expand,
  },
  render::{
    RenderConfig,
    config::{
      STACK_NAME_LABEL,
      STACK_NAME_WIDTH,
      STACKLINE,
    },
    result_line::{
      RowState,
      render_result,
    },
  },
  surface::{
    Surface,
    XAlign,
    YAlign,
  },
};

/// What a finished frame looked like.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
  /// Results that could not be drawn, by absolute index.
  pub failed_rows: Vec<(usize, DrawError)>,
  /// Where the caret was placed, if anywhere.
  pub caret:       Option<(usize, usize)>,
}

#[derive(Debug, Clone, Default)]
pub struct FrameComposer {
  config: RenderConfig,
}

impl FrameComposer {
  pub fn new(config: RenderConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &RenderConfig {
    &self.config
  }

  pub fn config_mut(&mut self) -> &mut RenderConfig {
    &mut self.config
  }

  /// Snapshots `model` and draws it on `surface`.
  ///
  /// Only a failed flush is an error; everything else is recovered within
  /// the frame and listed in the report.
  pub fn refresh<M, S>(&self, model: &Mutex<M>, surface: &mut S) -> Result<FrameReport, RenderError>
  where
    M: ResultModel + ?Sized,
    S: Surface + ?Sized,
  {
    let window_rows = surface.y_end() - surface.y_begin();
    let snapshot = {
      let model = model.lock();
      FrameSnapshot::capture(&*model, window_rows)
    };
    self.draw(&snapshot, surface)
  }

  /// Draws an already captured snapshot.
  pub fn draw<S: Surface + ?Sized>(
    &self,
    snapshot: &FrameSnapshot,
    surface: &mut S,
  ) -> Result<FrameReport, RenderError> {
    let mut report = FrameReport::default();

    if let Err(err) = surface.erase() {
      log::debug!("erase failed: {err}");
    }
    self.draw_results(snapshot, surface, &mut report);
    self.draw_stack(snapshot, surface);
    report.caret = self.draw_prompts(snapshot, surface);
    if !snapshot.query_mode {
      report.caret = self.draw_stack_name_prompt(snapshot, surface);
    }
    self.place_caret(report.caret, surface);

    surface.flush().map_err(RenderError::Flush)?;
    Ok(report)
  }

  fn results_origin<S: Surface + ?Sized>(&self, surface: &S) -> usize {
    self
      .config
      .results_offset_v(surface.y_begin(), surface.y_end())
  }

  fn draw_results<S: Surface + ?Sized>(
    &self,
    snapshot: &FrameSnapshot,
    surface: &mut S,
    report: &mut FrameReport,
  ) {
    let origin = self.results_origin(surface);

    for (nth, row) in snapshot.rows.iter().enumerate() {
      let index = row.candidate.index;
      let state = RowState {
        current: index == snapshot.page.index,
        marked:  row.marked,
      };
      let drawn = match self.config.step(origin, nth) {
        Some(y) => render_result(surface, y, &row.candidate, state, &self.config),
        None => {
          Err(DrawError::AboveTop {
            origin,
            offset: nth,
          })
        },
      };
      if let Err(err) = drawn {
        log::warn!("failed to draw result {index}: {err}");
        report.failed_rows.push((index, err));
      }
    }

    if let Some((index, err)) = report.failed_rows.first() {
      let message = format!("Error at line {index}: {err}");
      if let Err(err) = surface.put_aligned(
        &message,
        self.config.theme.error,
        origin,
        0,
        YAlign::Top,
        XAlign::Left,
        true,
      ) {
        log::debug!("error banner failed: {err}");
      }
    }
  }

  /// Row of the stack header, right after the last result row.
  fn stack_header_row<S: Surface + ?Sized>(&self, snapshot: &FrameSnapshot, surface: &S) -> Option<usize> {
    self
      .config
      .step(self.results_origin(surface), snapshot.page.capacity)
  }

  fn draw_stack<S: Surface + ?Sized>(&self, snapshot: &FrameSnapshot, surface: &mut S) {
    let Some(header) = self.stack_header_row(snapshot, surface) else {
      log::debug!("no room for the command stack");
      return;
    };
    let style = self.config.theme.basic;
    let lines = std::iter::once(STACKLINE).chain(snapshot.stack.iter().map(String::as_str));
    for (nth, text) in lines.enumerate() {
      let Some(y) = self.config.step(header, nth) else {
        break;
      };
      if let Err(err) = surface.put_str(y, 0, text, style, None) {
        log::debug!("stack line {nth} failed: {err}");
      }
    }
  }

  /// Draws `rprompt` then `prompt`. Returns the caret position if a template
  /// shows the query.
  fn draw_prompts<S: Surface + ?Sized>(
    &self,
    snapshot: &FrameSnapshot,
    surface: &mut S,
  ) -> Option<(usize, usize)> {
    let y = self
      .config
      .prompt_offset_v(surface.y_begin(), surface.y_end());
    let ctx = PromptContext::new(
      &snapshot.query,
      snapshot.caret,
      &snapshot.page,
      &snapshot.last_key,
    );
    let caret_offset = width_until_char(&snapshot.query, snapshot.caret);

    let mut caret = None;
    for (template, align) in [
      (&self.config.rprompt, XAlign::Right),
      (&self.config.prompt, XAlign::Left),
    ] {
      let line = expand(template, &ctx, self.config.theme.basic);
      match surface.put_tokens_aligned(&line.tokens, y, 0, YAlign::Top, align) {
        Ok((row, col)) => {
          if let Some(query_column) = line.query_column {
            caret = Some((row, col + query_column + caret_offset));
          }
        },
        Err(err) => log::debug!("prompt '{template}' failed: {err}"),
      }
    }
    caret
  }

  /// Draws the stack-name input to the right of the stack header. Returns
  /// the caret position at the end of the input.
  fn draw_stack_name_prompt<S: Surface + ?Sized>(
    &self,
    snapshot: &FrameSnapshot,
    surface: &mut S,
  ) -> Option<(usize, usize)> {
    let y = self.stack_header_row(snapshot, surface)?;
    let x = screen_len(STACKLINE);
    let text = format!("{STACK_NAME_LABEL}{}", snapshot.stack_name_input);
    let max_width = screen_len(STACK_NAME_LABEL) + STACK_NAME_WIDTH;
    match surface.put_str(y, x, &text, self.config.theme.basic, Some(max_width)) {
      Ok(written) => Some((y, x + written)),
      Err(err) => {
        log::debug!("stack name prompt failed: {err}");
        None
      },
    }
  }

  fn place_caret<S: Surface + ?Sized>(&self, caret: Option<(usize, usize)>, surface: &mut S) {
    let placed = match caret {
      Some((row, col)) => surface.move_cursor(row, col),
      None => surface.hide_cursor(),
    };
    if let Err(err) = placed {
      log::debug!("skipping caret for this frame: {err}");
    }
  }
}
