//! Partial-update plumbing shared by the patch types.
//!
//! A patch field is `Option<T>` when the value can only be replaced and
//! `Option<Option<T>>` when it can also be cleared: the outer `Option` is
//! "present in the patch", the inner one the new value.

use serde::{Deserialize, Deserializer};

use crate::validate::non_blank;

/// For patch fields that may be cleared: absent stays `None`, an explicit
/// `null` becomes `Some(None)`. Use with `#[serde(default)]`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

/// Replace required text, trimmed.
pub(crate) fn set_text(slot: &mut String, value: &Option<String>) {
  if let Some(value) = value {
    *slot = value.trim().to_owned();
  }
}

/// Replace or clear optional text; blank clears.
pub(crate) fn set_opt_text(slot: &mut Option<String>, value: &Option<Option<String>>) {
  if let Some(value) = value {
    *slot = non_blank(value.clone());
  }
}

pub(crate) fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
  if let Some(value) = value {
    *slot = value.clone();
  }
}
