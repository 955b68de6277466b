//! Field-level validation and locale-tolerant numeric input.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─── Field errors ────────────────────────────────────────────────────────────

/// A single rejected field with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   &'static str,
  pub message: String,
}

impl FieldError {
  pub fn new(field: &'static str, message: impl Into<String>) -> Self {
    Self { field, message: message.into() }
  }
}

/// A non-empty set of field errors collected during one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
  pub fn single(field: &'static str, message: impl Into<String>) -> Self {
    Self(vec![FieldError::new(field, message)])
  }

  pub fn fields(&self) -> &[FieldError] { &self.0 }

  /// Whether any error is attached to `field`.
  pub fn has(&self, field: &str) -> bool {
    self.0.iter().any(|e| e.field == field)
  }
}

impl From<Vec<FieldError>> for ValidationErrors {
  fn from(errors: Vec<FieldError>) -> Self { Self(errors) }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, e) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{}: {}", e.field, e.message)?;
    }
    Ok(())
  }
}

// ─── Validator ───────────────────────────────────────────────────────────────

/// Accumulates field errors so a caller sees every problem at once.
#[derive(Debug, Default)]
pub struct Validator {
  errors: Vec<FieldError>,
}

impl Validator {
  pub fn new() -> Self { Self::default() }

  /// Reject empty or whitespace-only text.
  pub fn require_text(&mut self, field: &'static str, value: &str) -> &mut Self {
    if value.trim().is_empty() {
      self.push(field, "is required");
    }
    self
  }

  pub fn check(
    &mut self,
    ok: bool,
    field: &'static str,
    message: impl Into<String>,
  ) -> &mut Self {
    if !ok {
      self.push(field, message);
    }
    self
  }

  pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.errors.push(FieldError::new(field, message));
  }

  pub fn finish(self) -> Result<(), ValidationErrors> {
    if self.errors.is_empty() {
      Ok(())
    } else {
      Err(ValidationErrors(self.errors))
    }
  }
}

/// Collapse blank optional text to `None` and trim the rest.
pub fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
}

/// A permissive `local@domain.tld` shape check.
pub fn looks_like_email(value: &str) -> bool {
  match value.trim().split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
    }
    None => false,
  }
}

/// Digits with optional `+`, spaces, dashes and parentheses; at least five
/// digits.
pub fn looks_like_phone(value: &str) -> bool {
  let value = value.trim();
  let allowed = value
    .chars()
    .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
  allowed && value.chars().filter(char::is_ascii_digit).count() >= 5
}

// ─── Decimal input ───────────────────────────────────────────────────────────

/// Parse a decimal number written with either `.` or `,` as the separator.
pub fn parse_decimal(input: &str) -> Option<f64> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return None;
  }
  let normalised = trimmed.replace(',', ".");
  normalised.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Either a JSON number or text accepted by [`parse_decimal`].
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
  Number(f64),
  Text(String),
}

/// Deserialise an optional decimal from a number, a string with either
/// separator, or `null`. Blank text reads as `None`. Use with
/// `#[serde(default)]`.
pub fn opt_decimal<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
  match Option::<RawDecimal>::deserialize(de)? {
    None => Ok(None),
    Some(RawDecimal::Number(n)) => Ok(Some(n)),
    Some(RawDecimal::Text(s)) if s.trim().is_empty() => Ok(None),
    Some(RawDecimal::Text(s)) => parse_decimal(&s)
      .map(Some)
      .ok_or_else(|| serde::de::Error::custom(format!("{s:?} is not a number"))),
  }
}

/// Lesson duration in hours; always within `0.1..=1000`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Hours(f64);

impl Hours {
  pub const MIN: f64 = 0.1;
  pub const MAX: f64 = 1000.0;

  pub fn new(value: f64) -> Option<Self> {
    (value.is_finite() && (Self::MIN..=Self::MAX).contains(&value))
      .then_some(Self(value))
  }

  pub fn get(self) -> f64 { self.0 }
}

impl fmt::Display for Hours {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidHours;

impl fmt::Display for InvalidHours {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "duration must be a number between {} and {}", Hours::MIN, Hours::MAX)
  }
}

impl std::error::Error for InvalidHours {}

impl FromStr for Hours {
  type Err = InvalidHours;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    parse_decimal(s).and_then(Hours::new).ok_or(InvalidHours)
  }
}

impl Serialize for Hours {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(self.0)
  }
}

impl<'de> Deserialize<'de> for Hours {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let hours = match RawDecimal::deserialize(deserializer)? {
      RawDecimal::Number(n) => Hours::new(n),
      RawDecimal::Text(s) => s.parse().ok(),
    };
    hours.ok_or_else(|| serde::de::Error::custom(InvalidHours))
  }
}
