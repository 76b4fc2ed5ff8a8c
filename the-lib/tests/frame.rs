//! Full frames drawn on an in-memory surface.

use std::{
  borrow::Cow,
  sync::Arc,
};

use parking_lot::Mutex;
use the_lib::{
  DrawError,
  RenderError,
  error::Result as DrawResult,
  fold::FoldSpec,
  model::{
    Candidate,
    FrameSnapshot,
    ResultModel,
    SnapshotRow,
    SubqueryMatch,
  },
  page::PageGeometry,
  remap::Occurrence,
  render::{
    FrameComposer,
    RenderConfig,
    config::STACKLINE,
  },
  style::{
    Color,
    Style,
  },
  surface::{
    GridSurface,
    Surface,
  },
};

struct ListModel {
  lines:      Vec<String>,
  hits:       Vec<Vec<Occurrence>>,
  index:      usize,
  marked:     Vec<usize>,
  query:      String,
  caret:      usize,
  stack:      Vec<String>,
  query_mode: bool,
  stack_name: String,
}

impl ListModel {
  fn new(lines: &[&str]) -> Self {
    Self {
      lines:      lines.iter().map(|l| l.to_string()).collect(),
      hits:       vec![Vec::new(); lines.len()],
      index:      0,
      marked:     Vec::new(),
      query:      String::new(),
      caret:      0,
      stack:      Vec::new(),
      query_mode: true,
      stack_name: String::new(),
    }
  }

  fn with_query(mut self, query: &str, caret: usize) -> Self {
    self.query = query.to_string();
    self.caret = caret;
    self
  }
}

impl ResultModel for ListModel {
  fn results_count(&self) -> usize {
    self.lines.len()
  }

  fn candidate(&self, index: usize) -> Option<Candidate<'_>> {
    let line = self.lines.get(index)?;
    let hits = &self.hits[index];
    let matches = (!hits.is_empty()).then(|| {
      Cow::Owned(vec![SubqueryMatch {
        subquery:    self.query.clone(),
        occurrences: hits.clone(),
      }])
    });
    Some(Candidate {
      line: Cow::Borrowed(line.as_str()),
      matches,
      index,
    })
  }

  fn index(&self) -> usize {
    self.index
  }

  fn is_marked(&self, index: usize) -> bool {
    self.marked.contains(&index)
  }

  fn query(&self) -> &str {
    &self.query
  }

  fn caret(&self) -> usize {
    self.caret
  }

  fn stack(&self) -> &[String] {
    &self.stack
  }

  fn query_mode(&self) -> bool {
    self.query_mode
  }

  fn stack_name_input(&self) -> &str {
    &self.stack_name
  }
}

fn fruits() -> ListModel {
  ListModel::new(&["apple", "banana", "cherry"])
}

#[test]
fn draws_prompt_results_and_stack() {
  let model = Mutex::new(fruits().with_query("an", 1));
  let mut surface = GridSurface::new(40, 8);
  let composer = FrameComposer::default();

  let report = composer.refresh(&model, &mut surface).unwrap();

  assert!(report.failed_rows.is_empty());
  let prompt = surface.row_text(0);
  assert!(prompt.starts_with("QUERY> an "), "{prompt:?}");
  assert!(prompt.ends_with("(1/3) [1/1]"), "{prompt:?}");
  assert_eq!(surface.row_text(1), "apple");
  assert_eq!(surface.row_text(2), "banana");
  assert_eq!(surface.row_text(3), "cherry");
  assert_eq!(surface.row_text(7), STACKLINE);

  let theme = composer.config().theme;
  assert_eq!(surface.style_at(1, 0), Some(theme.selected));
  assert_eq!(surface.style_at(2, 0), Some(theme.basic));
  // caret sits after the first char of the query
  assert_eq!(surface.cursor(), Some((0, 8)));
  assert_eq!(report.caret, Some((0, 8)));
  assert_eq!(surface.flush_count(), 1);
}

#[test]
fn failed_row_does_not_stop_the_frame() {
  let model = Mutex::new(fruits());
  let mut surface = GridSurface::new(40, 8);
  surface.fail_writes_on(2);

  let report = FrameComposer::default()
    .refresh(&model, &mut surface)
    .unwrap();

  assert_eq!(report.failed_rows.len(), 1);
  assert_eq!(report.failed_rows[0].0, 1);
  assert!(matches!(report.failed_rows[0].1, DrawError::Io(_)));
  assert!(surface.row_text(1).starts_with("Error at line 1: "));
  assert_eq!(surface.row_text(3), "cherry");
  assert_eq!(surface.row_text(7), STACKLINE);
  assert!(surface.row_text(0).starts_with("QUERY> "));
  assert_eq!(surface.flush_count(), 1);
}

#[test]
fn error_banner_uses_error_style() {
  let model = Mutex::new(fruits());
  let mut surface = GridSurface::new(40, 8);
  surface.fail_writes_on(3);

  let composer = FrameComposer::default();
  composer.refresh(&model, &mut surface).unwrap();

  assert_eq!(surface.style_at(1, 0), Some(composer.config().theme.error));
  assert_eq!(surface.style_at(1, 39), Some(composer.config().theme.error));
}

#[test]
fn bottom_up_with_prompt_at_the_bottom() {
  let mut list = fruits();
  list.stack = vec!["first".to_string()];
  let model = Mutex::new(list);
  let mut surface = GridSurface::new(40, 8);
  let composer = FrameComposer::new(RenderConfig {
    results_top_down: false,
    prompt_on_top: false,
    ..RenderConfig::default()
  });

  composer.refresh(&model, &mut surface).unwrap();

  assert_eq!(surface.rows(), vec![
    "first".to_string(),
    STACKLINE.to_string(),
    String::new(),
    String::new(),
    "cherry".to_string(),
    "banana".to_string(),
    "apple".to_string(),
    format!("QUERY> {}(1/3) [1/1]", " ".repeat(22)),
  ]);
  assert_eq!(surface.cursor(), Some((7, 7)));
}

#[test]
fn shows_the_page_holding_the_selection() {
  let lines: Vec<String> = (0..20).map(|i| format!("line {i}")).collect();
  let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
  let mut list = ListModel::new(&lines);
  list.index = 13;
  list.marked = vec![12];
  let model = Mutex::new(list);
  let mut surface = GridSurface::new(40, 8);
  let composer = FrameComposer::default();

  composer.refresh(&model, &mut surface).unwrap();

  // 6 results per page: the selection is on page 3
  assert!(surface.row_text(0).ends_with("(14/20) [3/4]"));
  assert_eq!(surface.row_text(1), "line 12");
  assert_eq!(surface.row_text(6), "line 17");
  let theme = composer.config().theme;
  assert_eq!(surface.style_at(1, 0), Some(theme.marked));
  assert_eq!(surface.style_at(2, 0), Some(theme.selected));
}

#[test]
fn highlights_hits_in_folded_lines() {
  let mut list = ListModel::new(&["src >< main.rs >< fn main", "docs >< readme"]);
  list.hits[0] = vec![Occurrence::new(21, 4)];
  let model = Mutex::new(list.with_query("main", 4));
  let mut surface = GridSurface::new(40, 8);
  let composer = FrameComposer::new(RenderConfig {
    fold: FoldSpec::from_iter([1]),
    ..RenderConfig::default()
  });

  composer.refresh(&model, &mut surface).unwrap();

  assert_eq!(surface.row_text(1), "src >< .. >< fn main");
  assert_eq!(surface.row_text(2), "docs >< ..");
  let hit = surface.style_at(1, 16).unwrap();
  assert_eq!(hit.fg, Some(Color::Yellow));
  assert_eq!(hit.bg, Some(Color::Magenta));
  assert_eq!(surface.style_at(1, 15), Some(composer.config().theme.selected));
}

#[test]
fn stack_name_prompt_takes_the_caret() {
  let mut list = fruits();
  list.query_mode = false;
  list.stack_name = "build".to_string();
  let model = Mutex::new(list);
  let mut surface = GridSurface::new(60, 8);

  let report = FrameComposer::default()
    .refresh(&model, &mut surface)
    .unwrap();

  assert_eq!(surface.row_text(7), format!("{STACKLINE} name> build"));
  assert_eq!(report.caret, Some((7, 45)));
  assert_eq!(surface.cursor(), Some((7, 45)));
}

#[test]
fn flush_failure_is_reported() {
  let model = Mutex::new(fruits());
  let mut surface = GridSurface::new(40, 8);
  surface.fail_flush(true);

  let err = FrameComposer::default()
    .refresh(&model, &mut surface)
    .unwrap_err();
  assert!(matches!(err, RenderError::Flush(DrawError::Io(_))));
  // the frame was still drawn and the model is free again
  assert_eq!(surface.row_text(1), "apple");
  assert!(model.try_lock().is_some());
}

#[test]
fn tiny_surface_never_panics() {
  let model = Mutex::new(fruits().with_query("a", 1));
  for (width, height) in [(0, 0), (1, 1), (3, 2), (10, 1)] {
    let mut surface = GridSurface::new(width, height);
    let result = FrameComposer::default().refresh(&model, &mut surface);
    assert!(result.is_ok(), "{width}x{height}: {result:?}");
  }
}

#[test]
fn caret_tracks_wide_query_text() {
  let model = Mutex::new(fruits().with_query("日本語", 2));
  let mut surface = GridSurface::new(40, 8);

  let report = FrameComposer::default()
    .refresh(&model, &mut surface)
    .unwrap();

  assert_eq!(report.caret, Some((0, 11)));
}

/// Grid surface that fails the test when written to while the model is
/// locked.
struct UnlockedOnly {
  grid:   GridSurface,
  model:  Arc<Mutex<ListModel>>,
  writes: usize,
}

impl UnlockedOnly {
  fn check(&mut self, what: &str) {
    assert!(self.model.try_lock().is_some(), "{what} while the model is locked");
    self.writes += 1;
  }
}

impl Surface for UnlockedOnly {
  fn size(&self) -> (usize, usize) {
    self.grid.size()
  }

  fn erase(&mut self) -> DrawResult<()> {
    self.check("erase");
    self.grid.erase()
  }

  fn put_str(
    &mut self,
    row: usize,
    col: usize,
    text: &str,
    style: Style,
    max_width: Option<usize>,
  ) -> DrawResult<usize> {
    self.check("put_str");
    self.grid.put_str(row, col, text, style, max_width)
  }

  fn fill(&mut self, row: usize, col: usize, width: usize, style: Style) -> DrawResult<()> {
    self.check("fill");
    self.grid.fill(row, col, width, style)
  }

  fn move_cursor(&mut self, row: usize, col: usize) -> DrawResult<()> {
    self.check("move_cursor");
    self.grid.move_cursor(row, col)
  }

  fn hide_cursor(&mut self) -> DrawResult<()> {
    self.check("hide_cursor");
    self.grid.hide_cursor()
  }

  fn flush(&mut self) -> DrawResult<()> {
    self.check("flush");
    self.grid.flush()
  }
}

#[test]
fn surface_is_never_written_under_the_lock() {
  let mut list = fruits().with_query("an", 1);
  list.stack = vec!["first".to_string()];
  let model = Arc::new(Mutex::new(list));
  let mut surface = UnlockedOnly {
    grid:   GridSurface::new(40, 8),
    model:  Arc::clone(&model),
    writes: 0,
  };

  FrameComposer::default()
    .refresh(&*model, &mut surface)
    .unwrap();

  assert!(surface.writes > 5);
  assert_eq!(surface.grid.row_text(1), "apple");
}

#[test]
fn rows_above_the_surface_name_their_position() {
  let config = RenderConfig {
    results_top_down: false,
    ..RenderConfig::default()
  };
  let rows = (0..5)
    .map(|index| {
      SnapshotRow {
        candidate: Candidate {
          line: Cow::Owned(format!("line {index}")),
          matches: None,
          index,
        },
        marked:    false,
      }
    })
    .collect();
  let snapshot = FrameSnapshot {
    page: PageGeometry::with_capacity(5, 0, 5),
    rows,
    query: String::new(),
    caret: 0,
    stack: Vec::new(),
    query_mode: true,
    last_key: String::new(),
    stack_name_input: String::new(),
  };
  let mut surface = GridSurface::new(60, 3);

  let report = FrameComposer::new(config)
    .draw(&snapshot, &mut surface)
    .unwrap();

  assert_eq!(report.failed_rows, vec![
    (3, DrawError::AboveTop {
      origin: 2,
      offset: 3,
    }),
    (4, DrawError::AboveTop {
      origin: 2,
      offset: 4,
    }),
  ]);
  assert!(surface.row_text(2).starts_with("Error at line 3: row 2 - 3"));
}
