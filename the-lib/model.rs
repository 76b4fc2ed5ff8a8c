//! The result model consumed by the renderer.
//!
//! The model is owned and mutated elsewhere (key handling, matching). The
//! renderer only reads it, once per frame, through [`FrameSnapshot::capture`].

use std::borrow::Cow;

use crate::{
  page::PageGeometry,
  remap::Occurrence,
};

/// Where one sub-query matched a line, in the line's own byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubqueryMatch {
  pub subquery:    String,
  pub occurrences: Vec<Occurrence>,
}

/// One ranked result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
  pub line:    Cow<'a, str>,
  /// `None` when there is nothing to highlight.
  pub matches: Option<Cow<'a, [SubqueryMatch]>>,
  /// Absolute position in the result list.
  pub index:   usize,
}

impl Candidate<'_> {
  pub fn into_owned(self) -> Candidate<'static> {
    Candidate {
      line:    Cow::Owned(self.line.into_owned()),
      matches: self.matches.map(|m| Cow::Owned(m.into_owned())),
      index:   self.index,
    }
  }
}

pub trait ResultModel {
  fn results_count(&self) -> usize;

  /// The result at absolute position `index`.
  fn candidate(&self, index: usize) -> Option<Candidate<'_>>;

  /// Selected result.
  fn index(&self) -> usize;

  fn is_marked(&self, index: usize) -> bool;

  fn query(&self) -> &str;

  /// Caret position in the query, in chars.
  fn caret(&self) -> usize;

  /// Command stack, oldest first.
  fn stack(&self) -> &[String];

  /// `false` while the user is naming a stack entry instead of editing the
  /// query.
  fn query_mode(&self) -> bool {
    true
  }

  fn last_key(&self) -> &str {
    ""
  }

  /// Pending text of the stack-name prompt.
  fn stack_name_input(&self) -> &str {
    ""
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
  pub candidate: Candidate<'static>,
  pub marked:    bool,
}

/// Everything one frame needs, copied out of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSnapshot {
  pub page:             PageGeometry,
  /// Results of the current page, in order.
  pub rows:             Vec<SnapshotRow>,
  pub query:            String,
  pub caret:            usize,
  pub stack:            Vec<String>,
  pub query_mode:       bool,
  pub last_key:         String,
  pub stack_name_input: String,
}

impl FrameSnapshot {
  /// Copies the page holding the selection for a window of `window_rows`
  /// result and stack rows.
  pub fn capture<M: ResultModel + ?Sized>(model: &M, window_rows: usize) -> Self {
    let stack = model.stack().to_vec();
    let count = model.results_count();
    let page = PageGeometry::new(window_rows, stack.len(), model.index(), count);

    let rows = page
      .window()
      .filter_map(|index| {
        let Some(candidate) = model.candidate(index) else {
          log::debug!("model has no candidate at {index} of {count}");
          return None;
        };
        Some(SnapshotRow {
          candidate: candidate.into_owned(),
          marked:    model.is_marked(index),
        })
      })
      .collect();

    Self {
      page,
      rows,
      query: model.query().to_string(),
      caret: model.caret(),
      stack,
      query_mode: model.query_mode(),
      last_key: model.last_key().to_string(),
      stack_name_input: model.stack_name_input().to_string(),
    }
  }
}
