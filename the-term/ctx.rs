//! Application state shared between the input reader and the render loop.

use std::{
  borrow::Cow,
  collections::BTreeSet,
};

use the_core::grapheme::char_to_byte_idx;
use the_lib::{
  model::{
    Candidate,
    ResultModel,
    SubqueryMatch,
  },
  page::PageGeometry,
};

use crate::matcher::Matcher;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Hit {
  line:    usize,
  matches: Vec<SubqueryMatch>,
}

pub struct Ctx {
  lines:            Vec<String>,
  matcher:          Matcher,
  results:          Vec<Hit>,
  index:            usize,
  /// Marked lines, by position in `lines`.
  marked:           BTreeSet<usize>,
  query:            String,
  /// Caret position in chars.
  caret:            usize,
  stack:            Vec<String>,
  query_mode:       bool,
  stack_name:       String,
  last_key:         String,
  window_rows:      usize,
  pub needs_render: bool,
  pub should_quit:  bool,
  /// Lines chosen by the user, set when the picker finishes.
  pub selection:    Option<Vec<String>>,
}

impl Ctx {
  pub fn new(window_rows: usize) -> Self {
    Self {
      lines: Vec::new(),
      matcher: Matcher::default(),
      results: Vec::new(),
      index: 0,
      marked: BTreeSet::new(),
      query: String::new(),
      caret: 0,
      stack: Vec::new(),
      query_mode: true,
      stack_name: String::new(),
      last_key: String::new(),
      window_rows,
      needs_render: true,
      should_quit: false,
      selection: None,
    }
  }

  /// Appends input lines, matching them against the current query.
  pub fn push_lines(&mut self, lines: impl IntoIterator<Item = String>) {
    let start = self.lines.len();
    self.lines.extend(lines);
    for line in start..self.lines.len() {
      if let Some(matches) = self.matcher.find(&self.lines[line]) {
        self.results.push(Hit { line, matches });
      }
    }
    self.needs_render = true;
  }

  pub fn line_count(&self) -> usize {
    self.lines.len()
  }

  fn refilter(&mut self) {
    self.matcher = Matcher::new(&self.query);
    self.results = self
      .lines
      .iter()
      .enumerate()
      .filter_map(|(line, text)| self.matcher.find(text).map(|matches| Hit { line, matches }))
      .collect();
    self.index = self.index.min(self.results.len().saturating_sub(1));
    log::trace!("'{}' matches {} lines", self.query, self.results.len());
    self.needs_render = true;
  }

  pub fn resize(&mut self, window_rows: usize) {
    self.window_rows = window_rows;
    self.needs_render = true;
  }

  pub fn set_last_key(&mut self, key: String) {
    self.last_key = key;
  }

  fn page_size(&self) -> usize {
    PageGeometry::capacity_for(self.window_rows, self.stack.len())
  }

  // Query editing

  pub fn insert_char(&mut self, c: char) {
    let at = char_to_byte_idx(&self.query, self.caret);
    self.query.insert(at, c);
    self.caret += 1;
    self.refilter();
  }

  pub fn delete_backward(&mut self) {
    if self.caret == 0 {
      return;
    }
    self.caret -= 1;
    let at = char_to_byte_idx(&self.query, self.caret);
    self.query.remove(at);
    self.refilter();
  }

  pub fn delete_forward(&mut self) {
    let at = char_to_byte_idx(&self.query, self.caret);
    if at < self.query.len() {
      self.query.remove(at);
      self.refilter();
    }
  }

  pub fn move_caret(&mut self, delta: isize) {
    let len = self.query.chars().count();
    self.caret = self.caret.saturating_add_signed(delta).min(len);
    self.needs_render = true;
  }

  pub fn caret_home(&mut self) {
    self.caret = 0;
    self.needs_render = true;
  }

  pub fn caret_end(&mut self) {
    self.caret = self.query.chars().count();
    self.needs_render = true;
  }

  // Selection

  pub fn select(&mut self, index: usize) {
    self.index = index.min(self.results.len().saturating_sub(1));
    self.needs_render = true;
  }

  pub fn select_next(&mut self) {
    self.select(self.index + 1);
  }

  pub fn select_prev(&mut self) {
    self.select(self.index.saturating_sub(1));
  }

  pub fn page_down(&mut self) {
    self.select(self.index + self.page_size());
  }

  pub fn page_up(&mut self) {
    self.select(self.index.saturating_sub(self.page_size()));
  }

  /// Toggles the mark on the selected line and moves to the next one.
  pub fn toggle_mark(&mut self) {
    let Some(hit) = self.results.get(self.index) else {
      return;
    };
    if !self.marked.remove(&hit.line) {
      self.marked.insert(hit.line);
    }
    self.select_next();
  }

  // Command stack

  /// Pushes the query onto the command stack and starts a fresh one.
  pub fn push_stack(&mut self) {
    if self.query.trim().is_empty() {
      return;
    }
    self.stack.push(std::mem::take(&mut self.query));
    self.caret = 0;
    self.refilter();
  }

  /// Switches between editing the query and naming the newest stack entry.
  pub fn toggle_query_mode(&mut self) {
    self.query_mode = !self.query_mode;
    self.stack_name.clear();
    self.needs_render = true;
  }

  pub fn stack_name_push(&mut self, c: char) {
    self.stack_name.push(c);
    self.needs_render = true;
  }

  pub fn stack_name_pop(&mut self) {
    self.stack_name.pop();
    self.needs_render = true;
  }

  /// Prefixes the newest stack entry with the typed name.
  pub fn commit_stack_name(&mut self) {
    let name = std::mem::take(&mut self.stack_name);
    let name = name.trim();
    match self.stack.last_mut() {
      Some(entry) if !name.is_empty() => *entry = format!("{name}: {entry}"),
      Some(_) => {},
      None => log::debug!("no stack entry to name"),
    }
    self.query_mode = true;
    self.needs_render = true;
  }

  // Finishing

  /// Ends the session with the marked lines, or the selected one when
  /// nothing is marked.
  pub fn finish(&mut self) {
    let selection = if self.marked.is_empty() {
      self
        .results
        .get(self.index)
        .map(|hit| vec![self.lines[hit.line].clone()])
        .unwrap_or_default()
    } else {
      self
        .marked
        .iter()
        .map(|&line| self.lines[line].clone())
        .collect()
    };
    self.selection = Some(selection);
    self.should_quit = true;
  }

  pub fn cancel(&mut self) {
    self.selection = None;
    self.should_quit = true;
  }
}

impl ResultModel for Ctx {
  fn results_count(&self) -> usize {
    self.results.len()
  }

  fn candidate(&self, index: usize) -> Option<Candidate<'_>> {
    let hit = self.results.get(index)?;
    Some(Candidate {
      line: Cow::Borrowed(self.lines[hit.line].as_str()),
      matches: (!hit.matches.is_empty()).then_some(Cow::Borrowed(hit.matches.as_slice())),
      index,
    })
  }

  fn index(&self) -> usize {
    self.index
  }

  fn is_marked(&self, index: usize) -> bool {
    self
      .results
      .get(index)
      .is_some_and(|hit| self.marked.contains(&hit.line))
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

  fn last_key(&self) -> &str {
    &self.last_key
  }

  fn stack_name_input(&self) -> &str {
    &self.stack_name
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn ctx(lines: &[&str]) -> Ctx {
    let mut ctx = Ctx::new(11);
    ctx.push_lines(lines.iter().map(|l| l.to_string()));
    ctx
  }

  fn type_str(ctx: &mut Ctx, text: &str) {
    for c in text.chars() {
      ctx.insert_char(c);
    }
  }

  fn lines(ctx: &Ctx) -> Vec<String> {
    (0..ctx.results_count())
      .filter_map(|i| ctx.candidate(i))
      .map(|c| c.line.into_owned())
      .collect()
  }

  #[test]
  fn typing_filters_results() {
    let mut ctx = ctx(&["apple pie", "banana", "apple tart"]);
    assert_eq!(ctx.results_count(), 3);
    assert!(ctx.candidate(0).unwrap().matches.is_none());

    type_str(&mut ctx, "app e");
    assert_eq!(lines(&ctx), vec!["apple pie", "apple tart"]);
    let matches = ctx.candidate(1).unwrap().matches.unwrap();
    assert_eq!(matches.len(), 2);

    ctx.delete_backward();
    ctx.delete_backward();
    assert_eq!(ctx.query(), "app");
    assert_eq!(ctx.caret(), 3);
  }

  #[test]
  fn caret_edits_in_the_middle() {
    let mut ctx = ctx(&[]);
    type_str(&mut ctx, "日本");
    ctx.move_caret(-1);
    ctx.insert_char('x');
    assert_eq!(ctx.query(), "日x本");
    assert_eq!(ctx.caret(), 2);
    ctx.caret_home();
    ctx.delete_forward();
    assert_eq!(ctx.query(), "x本");
    ctx.move_caret(10);
    assert_eq!(ctx.caret(), 2);
  }

  #[test]
  fn lines_arriving_later_are_matched() {
    let mut ctx = ctx(&["one"]);
    type_str(&mut ctx, "t");
    ctx.push_lines(["two".to_string(), "six".to_string(), "ten".to_string()]);
    assert_eq!(lines(&ctx), vec!["two", "ten"]);
  }

  #[test]
  fn selection_is_clamped() {
    let mut ctx = ctx(&["a", "b", "c"]);
    ctx.select_prev();
    assert_eq!(ctx.index(), 0);
    ctx.page_down();
    assert_eq!(ctx.index(), 2);
    type_str(&mut ctx, "a");
    assert_eq!(ctx.index(), 0);
  }

  #[test]
  fn marks_follow_lines_across_queries() {
    let mut ctx = ctx(&["alpha", "beta", "gamma"]);
    ctx.select(1);
    ctx.toggle_mark();
    assert_eq!(ctx.index(), 2);
    assert!(ctx.is_marked(1));

    type_str(&mut ctx, "bet");
    assert!(ctx.is_marked(0));
    ctx.finish();
    assert_eq!(ctx.selection, Some(vec!["beta".to_string()]));
    assert!(ctx.should_quit);
  }

  #[test]
  fn finish_without_marks_takes_the_selection() {
    let mut ctx = ctx(&["alpha", "beta"]);
    ctx.select_next();
    ctx.finish();
    assert_eq!(ctx.selection, Some(vec!["beta".to_string()]));

    let mut empty = self::ctx(&[]);
    empty.finish();
    assert_eq!(empty.selection, Some(Vec::new()));
  }

  #[test]
  fn stack_entries_can_be_named() {
    let mut ctx = ctx(&["alpha"]);
    type_str(&mut ctx, "alp");
    ctx.push_stack();
    assert_eq!(ctx.stack(), ["alp"]);
    assert_eq!(ctx.query(), "");

    ctx.toggle_query_mode();
    assert!(!ctx.query_mode());
    for c in "first".chars() {
      ctx.stack_name_push(c);
    }
    assert_eq!(ctx.stack_name_input(), "first");
    ctx.commit_stack_name();
    assert!(ctx.query_mode());
    assert_eq!(ctx.stack(), ["first: alp"]);
  }

  #[test]
  fn stack_shrinks_the_page() {
    let mut ctx = ctx(&[]);
    assert_eq!(ctx.page_size(), 10);
    type_str(&mut ctx, "q");
    ctx.push_stack();
    assert_eq!(ctx.page_size(), 9);
  }
}
