//! Dynamic `WHERE` / `ORDER BY` construction for list queries.
//!
//! Every bound value in a list query is text (ids, timestamps, dates,
//! statuses), so one `Vec<String>` carries all parameters positionally.

use casework_core::{status::StatusValue, store::SortDirection};

#[derive(Debug, Default)]
pub struct Filter {
  conds:  Vec<String>,
  values: Vec<String>,
}

impl Filter {
  pub fn new() -> Self { Self::default() }

  fn push(&mut self, cond: String, value: Option<String>) -> &mut Self {
    if let Some(value) = value {
      self.conds.push(cond);
      self.values.push(value);
    }
    self
  }

  pub fn eq(&mut self, column: &str, value: Option<String>) -> &mut Self {
    self.push(format!("{column} = ?"), value)
  }

  /// Inclusive lower bound.
  pub fn at_least(&mut self, column: &str, value: Option<String>) -> &mut Self {
    self.push(format!("{column} >= ?"), value)
  }

  /// Inclusive upper bound.
  pub fn at_most(&mut self, column: &str, value: Option<String>) -> &mut Self {
    self.push(format!("{column} <= ?"), value)
  }

  /// Value-in-set; an empty set adds no condition.
  pub fn any_of<S: StatusValue>(&mut self, column: &str, statuses: &[S]) -> &mut Self {
    if !statuses.is_empty() {
      let marks = vec!["?"; statuses.len()].join(", ");
      self.conds.push(format!("{column} IN ({marks})"));
      self.values.extend(statuses.iter().map(|s| s.as_str().to_owned()));
    }
    self
  }

  pub fn where_clause(&self) -> String {
    if self.conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", self.conds.join(" AND "))
    }
  }

  pub fn values(&self) -> &[String] { &self.values }
}

pub fn direction(d: SortDirection) -> &'static str {
  match d {
    SortDirection::Asc => "ASC",
    SortDirection::Desc => "DESC",
  }
}

/// A `CASE` expression ranking `column` by declaration order of `S`.
pub fn lifecycle_rank<S: StatusValue>(column: &str) -> String {
  let arms: String = S::iter()
    .enumerate()
    .map(|(i, s)| format!(" WHEN '{}' THEN {i}", s.as_str()))
    .collect();
  format!("CASE {column}{arms} END")
}

/// Apply `offset` then `limit` to already-filtered rows.
pub fn page<T>(rows: impl IntoIterator<Item = T>, offset: Option<usize>, limit: Option<usize>) -> Vec<T> {
  rows
    .into_iter()
    .skip(offset.unwrap_or(0))
    .take(limit.unwrap_or(usize::MAX))
    .collect()
}
