//! Page geometry of the result list.
//!
//! Only one page of results is drawn per frame, so the cost of a refresh is
//! bounded by the number of rows on screen rather than by the result count.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
  /// Result rows per page, never zero.
  pub capacity:      usize,
  /// Index of the selected result.
  pub index:         usize,
  pub results_count: usize,
}

impl PageGeometry {
  /// Geometry for a window of `window_rows` rows that also shows a command
  /// stack of `stack_lines` entries below a one-line stack header.
  pub fn new(window_rows: usize, stack_lines: usize, index: usize, results_count: usize) -> Self {
    Self::with_capacity(
      Self::capacity_for(window_rows, stack_lines),
      index,
      results_count,
    )
  }

  pub fn with_capacity(capacity: usize, index: usize, results_count: usize) -> Self {
    Self {
      capacity: capacity.max(1),
      index,
      results_count,
    }
  }

  pub fn capacity_for(window_rows: usize, stack_lines: usize) -> usize {
    window_rows.saturating_sub(stack_lines + 1).max(1)
  }

  /// 1-based number of the page holding the selection.
  pub fn page_number(&self) -> usize {
    self.index / self.capacity + 1
  }

  pub fn total_pages(&self) -> usize {
    self.results_count.div_ceil(self.capacity).max(1)
  }

  /// First result index of the current page.
  pub fn head(&self) -> usize {
    self.capacity * (self.index / self.capacity)
  }

  /// One past the last result index the page can hold.
  pub fn tail(&self) -> usize {
    self.head() + self.capacity
  }

  /// Result indices actually on the page; shorter than `capacity` only on
  /// the final page.
  pub fn window(&self) -> Range<usize> {
    let head = self.head().min(self.results_count);
    head..self.tail().min(self.results_count)
  }

  pub fn contains(&self, index: usize) -> bool {
    self.head() <= index && index < self.tail()
  }
}
