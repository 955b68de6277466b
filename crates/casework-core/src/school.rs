//! Flight-school reference records and issued certificates.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  patch::{double_option, set, set_opt_text, set_text},
  status::CertificateStatus,
  validate::{ValidationErrors, Validator, looks_like_email},
};

fn check_email(v: &mut Validator, email: Option<&str>) {
  if let Some(email) = email.filter(|e| !e.trim().is_empty()) {
    v.check(looks_like_email(email), "email", "is not a valid email address");
  }
}

fn check_hours(v: &mut Validator, field: &'static str, hours: Option<f64>) {
  v.check(
    hours.is_none_or(|h| h.is_finite() && h >= 0.0),
    field,
    "must not be negative",
  );
}

fn check_year(v: &mut Validator, year: Option<i32>) {
  v.check(
    year.is_none_or(|y| (1900..=2100).contains(&y)),
    "year",
    "must be between 1900 and 2100",
  );
}

// ─── Courses ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
  pub course_id:      Uuid,
  pub name:           String,
  pub category:       Option<String>,
  pub description:    Option<String>,
  pub required_hours: Option<f64>,
  pub is_active:      bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
  pub name:           String,
  #[serde(default)]
  pub category:       Option<String>,
  #[serde(default)]
  pub description:    Option<String>,
  #[serde(default)]
  pub required_hours: Option<f64>,
  #[serde(default = "yes")]
  pub is_active:      bool,
}

fn yes() -> bool { true }

impl NewCourse {
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name:           name.into(),
      category:       None,
      description:    None,
      required_hours: None,
      is_active:      true,
    }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    v.require_text("name", &self.name);
    check_hours(&mut v, "required_hours", self.required_hours);
    v.finish()
  }
}

impl Course {
  pub fn patched(mut self, patch: &CoursePatch) -> Self {
    set_text(&mut self.name, &patch.name);
    set_opt_text(&mut self.category, &patch.category);
    set_opt_text(&mut self.description, &patch.description);
    set(&mut self.required_hours, &patch.required_hours);
    set(&mut self.is_active, &patch.is_active);
    self
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursePatch {
  #[serde(default)]
  pub name:           Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub category:       Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub description:    Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub required_hours: Option<Option<f64>>,
  #[serde(default)]
  pub is_active:      Option<bool>,
}

impl CoursePatch {
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    if let Some(name) = &self.name {
      v.require_text("name", name);
    }
    check_hours(&mut v, "required_hours", self.required_hours.flatten());
    v.finish()
  }
}

// ─── Students ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub student_id:  Uuid,
  pub full_name:   String,
  /// Unique across students when present.
  pub email:       Option<String>,
  pub phone:       Option<String>,
  pub birth_date:  Option<NaiveDate>,
  pub enrolled_on: Option<NaiveDate>,
  pub course_id:   Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
  pub full_name:   String,
  #[serde(default)]
  pub email:       Option<String>,
  #[serde(default)]
  pub phone:       Option<String>,
  #[serde(default)]
  pub birth_date:  Option<NaiveDate>,
  #[serde(default)]
  pub enrolled_on: Option<NaiveDate>,
  #[serde(default)]
  pub course_id:   Option<Uuid>,
}

impl NewStudent {
  pub fn named(full_name: impl Into<String>) -> Self {
    Self {
      full_name:   full_name.into(),
      email:       None,
      phone:       None,
      birth_date:  None,
      enrolled_on: None,
      course_id:   None,
    }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    v.require_text("full_name", &self.full_name);
    check_email(&mut v, self.email.as_deref());
    v.finish()
  }
}

impl Student {
  pub fn patched(mut self, patch: &StudentPatch) -> Self {
    set_text(&mut self.full_name, &patch.full_name);
    set_opt_text(&mut self.email, &patch.email);
    set_opt_text(&mut self.phone, &patch.phone);
    set(&mut self.birth_date, &patch.birth_date);
    set(&mut self.enrolled_on, &patch.enrolled_on);
    set(&mut self.course_id, &patch.course_id);
    self
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentPatch {
  #[serde(default)]
  pub full_name:   Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub email:       Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub phone:       Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub birth_date:  Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "double_option")]
  pub enrolled_on: Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "double_option")]
  pub course_id:   Option<Option<Uuid>>,
}

impl StudentPatch {
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    if let Some(name) = &self.full_name {
      v.require_text("full_name", name);
    }
    check_email(&mut v, self.email.as_ref().and_then(|e| e.as_deref()));
    v.finish()
  }
}

// ─── Instructors ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
  pub instructor_id: Uuid,
  pub full_name:     String,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub rank:          Option<String>,
  pub hired_on:      Option<NaiveDate>,
  pub is_active:     bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInstructor {
  pub full_name: String,
  #[serde(default)]
  pub email:     Option<String>,
  #[serde(default)]
  pub phone:     Option<String>,
  #[serde(default)]
  pub rank:      Option<String>,
  #[serde(default)]
  pub hired_on:  Option<NaiveDate>,
  #[serde(default = "yes")]
  pub is_active: bool,
}

impl NewInstructor {
  pub fn named(full_name: impl Into<String>) -> Self {
    Self {
      full_name: full_name.into(),
      email:     None,
      phone:     None,
      rank:      None,
      hired_on:  None,
      is_active: true,
    }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    v.require_text("full_name", &self.full_name);
    check_email(&mut v, self.email.as_deref());
    v.finish()
  }
}

impl Instructor {
  pub fn patched(mut self, patch: &InstructorPatch) -> Self {
    set_text(&mut self.full_name, &patch.full_name);
    set_opt_text(&mut self.email, &patch.email);
    set_opt_text(&mut self.phone, &patch.phone);
    set_opt_text(&mut self.rank, &patch.rank);
    set(&mut self.hired_on, &patch.hired_on);
    set(&mut self.is_active, &patch.is_active);
    self
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstructorPatch {
  #[serde(default)]
  pub full_name: Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub email:     Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub phone:     Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub rank:      Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub hired_on:  Option<Option<NaiveDate>>,
  #[serde(default)]
  pub is_active: Option<bool>,
}

impl InstructorPatch {
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    if let Some(name) = &self.full_name {
      v.require_text("full_name", name);
    }
    check_email(&mut v, self.email.as_ref().and_then(|e| e.as_deref()));
    v.finish()
  }
}

// ─── Aircraft ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
  pub aircraft_id: Uuid,
  /// Registration mark; unique across the fleet.
  pub tail_number: String,
  pub model:       Option<String>,
  pub kind:        Option<String>,
  pub year:        Option<i32>,
  pub total_hours: Option<f64>,
  /// Free-text airworthiness note, e.g. "in maintenance".
  pub status:      Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAircraft {
  pub tail_number: String,
  #[serde(default)]
  pub model:       Option<String>,
  #[serde(default)]
  pub kind:        Option<String>,
  #[serde(default)]
  pub year:        Option<i32>,
  #[serde(default)]
  pub total_hours: Option<f64>,
  #[serde(default)]
  pub status:      Option<String>,
}

impl NewAircraft {
  pub fn tail(tail_number: impl Into<String>) -> Self {
    Self {
      tail_number: tail_number.into(),
      model:       None,
      kind:        None,
      year:        None,
      total_hours: None,
      status:      None,
    }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    v.require_text("tail_number", &self.tail_number);
    check_year(&mut v, self.year);
    check_hours(&mut v, "total_hours", self.total_hours);
    v.finish()
  }
}

impl Aircraft {
  pub fn patched(mut self, patch: &AircraftPatch) -> Self {
    set_text(&mut self.tail_number, &patch.tail_number);
    set_opt_text(&mut self.model, &patch.model);
    set_opt_text(&mut self.kind, &patch.kind);
    set(&mut self.year, &patch.year);
    set(&mut self.total_hours, &patch.total_hours);
    set_opt_text(&mut self.status, &patch.status);
    self
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AircraftPatch {
  #[serde(default)]
  pub tail_number: Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub model:       Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub kind:        Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub year:        Option<Option<i32>>,
  #[serde(default, deserialize_with = "double_option")]
  pub total_hours: Option<Option<f64>>,
  #[serde(default, deserialize_with = "double_option")]
  pub status:      Option<Option<String>>,
}

impl AircraftPatch {
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    if let Some(tail) = &self.tail_number {
      v.require_text("tail_number", tail);
    }
    check_year(&mut v, self.year.flatten());
    check_hours(&mut v, "total_hours", self.total_hours.flatten());
    v.finish()
  }
}

// ─── Certificates ────────────────────────────────────────────────────────────

/// A certificate template, optionally bound to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
  pub certificate_id:        Uuid,
  pub title:                 String,
  pub description:           Option<String>,
  pub course_id:             Option<Uuid>,
  /// Validity applied to issued certificates that carry no explicit expiry.
  pub default_validity_days: Option<u32>,
}

impl Certificate {
  /// Expiry of a certificate issued on `issued_on` from this template.
  pub fn expiry_for(&self, issued_on: NaiveDate) -> Option<NaiveDate> {
    self
      .default_validity_days
      .and_then(|days| issued_on.checked_add_days(Days::new(u64::from(days))))
  }

  pub fn patched(mut self, patch: &CertificatePatch) -> Self {
    set_text(&mut self.title, &patch.title);
    set_opt_text(&mut self.description, &patch.description);
    set(&mut self.course_id, &patch.course_id);
    set(&mut self.default_validity_days, &patch.default_validity_days);
    self
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCertificate {
  pub title:                 String,
  #[serde(default)]
  pub description:           Option<String>,
  #[serde(default)]
  pub course_id:             Option<Uuid>,
  #[serde(default)]
  pub default_validity_days: Option<u32>,
}

impl NewCertificate {
  pub fn titled(title: impl Into<String>) -> Self {
    Self {
      title:                 title.into(),
      description:           None,
      course_id:             None,
      default_validity_days: None,
    }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    v.require_text("title", &self.title);
    check_validity(&mut v, self.default_validity_days);
    v.finish()
  }
}

fn check_validity(v: &mut Validator, days: Option<u32>) {
  v.check(days != Some(0), "default_validity_days", "must be positive");
}

/// Partial update for a template. Certificates already issued keep their
/// expiry when the validity window changes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificatePatch {
  #[serde(default)]
  pub title:                 Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub description:           Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub course_id:             Option<Option<Uuid>>,
  #[serde(default, deserialize_with = "double_option")]
  pub default_validity_days: Option<Option<u32>>,
}

impl CertificatePatch {
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    if let Some(title) = &self.title {
      v.require_text("title", title);
    }
    check_validity(&mut v, self.default_validity_days.flatten());
    v.finish()
  }
}

/// A certificate issued to a student from a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCertificate {
  pub student_certificate_id: Uuid,
  pub student_id:             Uuid,
  pub certificate_id:         Uuid,
  pub issued_on:              NaiveDate,
  pub number:                 Option<String>,
  pub valid_until:            Option<NaiveDate>,
  pub status:                 CertificateStatus,
  pub notes:                  Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStudentCertificate {
  pub student_id:     Uuid,
  pub certificate_id: Uuid,
  /// Defaults to the current date.
  #[serde(default)]
  pub issued_on:      Option<NaiveDate>,
  #[serde(default)]
  pub number:         Option<String>,
  /// Defaults to the template's validity window when absent.
  #[serde(default)]
  pub valid_until:    Option<NaiveDate>,
  #[serde(default)]
  pub status:         CertificateStatus,
  #[serde(default)]
  pub notes:          Option<String>,
}

impl NewStudentCertificate {
  pub fn new(student_id: Uuid, certificate_id: Uuid) -> Self {
    Self {
      student_id,
      certificate_id,
      issued_on: None,
      number: None,
      valid_until: None,
      status: CertificateStatus::default(),
      notes: None,
    }
  }

  /// Check the validity window once the issue date is known.
  pub fn validate(&self, issued_on: NaiveDate) -> Result<(), ValidationErrors> {
    check_window(issued_on, self.valid_until)
  }
}

fn check_window(
  issued_on: NaiveDate,
  valid_until: Option<NaiveDate>,
) -> Result<(), ValidationErrors> {
  let mut v = Validator::new();
  v.check(
    valid_until.is_none_or(|until| until >= issued_on),
    "valid_until",
    "must not precede the issue date",
  );
  v.finish()
}

impl StudentCertificate {
  pub fn patched(mut self, patch: &StudentCertificatePatch) -> Self {
    set(&mut self.student_id, &patch.student_id);
    set(&mut self.certificate_id, &patch.certificate_id);
    set(&mut self.issued_on, &patch.issued_on);
    set_opt_text(&mut self.number, &patch.number);
    set(&mut self.valid_until, &patch.valid_until);
    set(&mut self.status, &patch.status);
    set_opt_text(&mut self.notes, &patch.notes);
    self
  }

  /// The expiry may not precede the issue date.
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    check_window(self.issued_on, self.valid_until)
  }
}

/// Partial update for an issued certificate. Its expiry is not re-derived
/// from the template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentCertificatePatch {
  #[serde(default)]
  pub student_id:     Option<Uuid>,
  #[serde(default)]
  pub certificate_id: Option<Uuid>,
  #[serde(default)]
  pub issued_on:      Option<NaiveDate>,
  #[serde(default, deserialize_with = "double_option")]
  pub number:         Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub valid_until:    Option<Option<NaiveDate>>,
  #[serde(default)]
  pub status:         Option<CertificateStatus>,
  #[serde(default, deserialize_with = "double_option")]
  pub notes:          Option<Option<String>>,
}
