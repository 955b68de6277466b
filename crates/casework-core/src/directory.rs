//! Migration-desk reference records: migrants and the officers handling
//! their applications.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  patch::{double_option, set, set_opt_text, set_text},
  validate::{ValidationErrors, Validator, looks_like_email, looks_like_phone},
};

fn check_phone(v: &mut Validator, phone: &str) {
  if !phone.trim().is_empty() {
    v.check(looks_like_phone(phone), "phone_number", "is not a valid phone number");
  }
}

fn check_email(v: &mut Validator, email: Option<&str>) {
  if let Some(email) = email.filter(|e| !e.trim().is_empty()) {
    v.check(looks_like_email(email), "email", "is not a valid email address");
  }
}

/// A person on whose behalf applications are filed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Migrant {
  pub migrant_id:      Uuid,
  pub full_name:       String,
  pub passport_number: String,
  pub birth_date:      Option<NaiveDate>,
  pub address:         Option<String>,
  pub gender:          String,
  pub phone_number:    String,
}

/// Input to [`crate::store::CaseStore::add_migrant`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewMigrant {
  pub full_name:       String,
  pub passport_number: String,
  #[serde(default)]
  pub birth_date:      Option<NaiveDate>,
  #[serde(default)]
  pub address:         Option<String>,
  pub gender:          String,
  pub phone_number:    String,
}

impl NewMigrant {
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    v.require_text("full_name", &self.full_name)
      .require_text("passport_number", &self.passport_number)
      .require_text("gender", &self.gender)
      .require_text("phone_number", &self.phone_number);
    check_phone(&mut v, &self.phone_number);
    v.finish()
  }
}

impl Migrant {
  pub fn patched(mut self, patch: &MigrantPatch) -> Self {
    set_text(&mut self.full_name, &patch.full_name);
    set_text(&mut self.passport_number, &patch.passport_number);
    set(&mut self.birth_date, &patch.birth_date);
    set_opt_text(&mut self.address, &patch.address);
    set_text(&mut self.gender, &patch.gender);
    set_text(&mut self.phone_number, &patch.phone_number);
    self
  }
}

/// Partial update for a migrant; `null` clears an optional field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MigrantPatch {
  #[serde(default)]
  pub full_name:       Option<String>,
  #[serde(default)]
  pub passport_number: Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub birth_date:      Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "double_option")]
  pub address:         Option<Option<String>>,
  #[serde(default)]
  pub gender:          Option<String>,
  #[serde(default)]
  pub phone_number:    Option<String>,
}

impl MigrantPatch {
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    let required = [
      ("full_name", &self.full_name),
      ("passport_number", &self.passport_number),
      ("gender", &self.gender),
      ("phone_number", &self.phone_number),
    ];
    for (field, value) in required {
      if let Some(value) = value {
        v.require_text(field, value);
      }
    }
    if let Some(phone) = &self.phone_number {
      check_phone(&mut v, phone);
    }
    v.finish()
  }
}

/// A case officer. Credentials live outside this store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Officer {
  pub officer_id: Uuid,
  pub full_name:  String,
  pub position:   Option<String>,
  pub email:      Option<String>,
  /// Unique across officers.
  pub login:      String,
}

/// Input to [`crate::store::CaseStore::add_officer`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewOfficer {
  pub full_name: String,
  #[serde(default)]
  pub position:  Option<String>,
  #[serde(default)]
  pub email:     Option<String>,
  pub login:     String,
}

impl NewOfficer {
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    v.require_text("full_name", &self.full_name)
      .require_text("login", &self.login);
    check_email(&mut v, self.email.as_deref());
    v.finish()
  }
}

impl Officer {
  pub fn patched(mut self, patch: &OfficerPatch) -> Self {
    set_text(&mut self.full_name, &patch.full_name);
    set_opt_text(&mut self.position, &patch.position);
    set_opt_text(&mut self.email, &patch.email);
    set_text(&mut self.login, &patch.login);
    self
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfficerPatch {
  #[serde(default)]
  pub full_name: Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub position:  Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub email:     Option<Option<String>>,
  #[serde(default)]
  pub login:     Option<String>,
}

impl OfficerPatch {
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    if let Some(name) = &self.full_name {
      v.require_text("full_name", name);
    }
    if let Some(login) = &self.login {
      v.require_text("login", login);
    }
    check_email(&mut v, self.email.as_ref().and_then(|e| e.as_deref()));
    v.finish()
  }
}
