//! Substring matching of the query against candidate lines.
//!
//! The query is split on whitespace into sub-queries; a line is a result when
//! every sub-query occurs in it. A sub-query without uppercase letters
//! matches case-insensitively.

use regex::{
  Regex,
  RegexBuilder,
};
use the_lib::{
  model::SubqueryMatch,
  remap::Occurrence,
};

#[derive(Debug, Clone)]
struct Subquery {
  text:  String,
  regex: Regex,
}

#[derive(Debug, Clone, Default)]
pub struct Matcher {
  subqueries: Vec<Subquery>,
}

impl Matcher {
  pub fn new(query: &str) -> Self {
    let subqueries = query
      .split_whitespace()
      .filter_map(|text| {
        let smart_case = !text.chars().any(char::is_uppercase);
        match RegexBuilder::new(&regex::escape(text))
          .case_insensitive(smart_case)
          .build()
        {
          Ok(regex) => {
            Some(Subquery {
              text: text.to_string(),
              regex,
            })
          },
          Err(err) => {
            log::warn!("skipping sub-query '{text}': {err}");
            None
          },
        }
      })
      .collect();
    Self { subqueries }
  }

  /// An empty matcher accepts every line without highlights.
  pub fn is_empty(&self) -> bool {
    self.subqueries.is_empty()
  }

  /// Every occurrence of every sub-query in `line`, or `None` when some
  /// sub-query does not occur.
  pub fn find(&self, line: &str) -> Option<Vec<SubqueryMatch>> {
    self
      .subqueries
      .iter()
      .map(|subquery| {
        let occurrences: Vec<Occurrence> = subquery
          .regex
          .find_iter(line)
          .map(|m| Occurrence::new(m.start(), m.len()))
          .collect();
        (!occurrences.is_empty()).then(|| {
          SubqueryMatch {
            subquery: subquery.text.clone(),
            occurrences,
          }
        })
      })
      .collect()
  }
}
