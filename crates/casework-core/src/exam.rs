//! Exams a student sits for a course, optionally before an instructor.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
  patch::{double_option, set, set_opt_text},
  validate::{ValidationErrors, Validator, opt_decimal},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
  pub exam_id:       Uuid,
  pub student_id:    Uuid,
  pub course_id:     Uuid,
  /// The examiner.
  pub instructor_id: Option<Uuid>,
  pub date:          NaiveDate,
  pub score:         Option<f64>,
  /// Free-text outcome, e.g. "passed".
  pub result:        Option<String>,
}

fn check_score(v: &mut Validator, score: Option<f64>) {
  v.check(
    score.is_none_or(|s| s.is_finite() && s >= 0.0),
    "score",
    "must not be negative",
  );
}

/// Input to [`crate::store::CaseStore::add_exam`]. The score accepts a number
/// or a string with either decimal separator.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExam {
  pub student_id:    Uuid,
  pub course_id:     Uuid,
  #[serde(default)]
  pub instructor_id: Option<Uuid>,
  pub date:          NaiveDate,
  #[serde(default, deserialize_with = "opt_decimal")]
  pub score:         Option<f64>,
  #[serde(default)]
  pub result:        Option<String>,
}

impl NewExam {
  pub fn new(student_id: Uuid, course_id: Uuid, date: NaiveDate) -> Self {
    Self {
      student_id,
      course_id,
      instructor_id: None,
      date,
      score: None,
      result: None,
    }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    check_score(&mut v, self.score);
    v.finish()
  }
}

fn patch_score<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Option<f64>>, D::Error> {
  opt_decimal(de).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExamPatch {
  #[serde(default)]
  pub student_id:    Option<Uuid>,
  #[serde(default)]
  pub course_id:     Option<Uuid>,
  #[serde(default, deserialize_with = "double_option")]
  pub instructor_id: Option<Option<Uuid>>,
  #[serde(default)]
  pub date:          Option<NaiveDate>,
  #[serde(default, deserialize_with = "patch_score")]
  pub score:         Option<Option<f64>>,
  #[serde(default, deserialize_with = "double_option")]
  pub result:        Option<Option<String>>,
}

impl ExamPatch {
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    check_score(&mut v, self.score.flatten());
    v.finish()
  }
}

impl Exam {
  pub fn patched(mut self, patch: &ExamPatch) -> Self {
    set(&mut self.student_id, &patch.student_id);
    set(&mut self.course_id, &patch.course_id);
    set(&mut self.instructor_id, &patch.instructor_id);
    set(&mut self.date, &patch.date);
    set(&mut self.score, &patch.score);
    set_opt_text(&mut self.result, &patch.result);
    self
  }
}
