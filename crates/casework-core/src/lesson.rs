//! Lessons, the tracked record of the flight school.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  policy::{Tracked, apply_transition},
  status::LessonStatus,
  validate::{Hours, non_blank},
};

/// A scheduled or completed flight lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
  pub lesson_id:     Uuid,
  pub student_id:    Uuid,
  pub instructor_id: Uuid,
  pub course_id:     Option<Uuid>,
  pub aircraft_id:   Option<Uuid>,
  pub date:          NaiveDate,
  pub duration:      Hours,
  pub topic:         Option<String>,
  pub remarks:       Option<String>,
  pub status:        LessonStatus,
  pub version:       u32,
}

impl Tracked for Lesson {
  type Status = LessonStatus;

  fn status(&self) -> LessonStatus { self.status }

  fn set_status(&mut self, status: LessonStatus) { self.status = status; }
}

impl Lesson {
  /// Apply `patch`; fields absent from the patch are untouched.
  pub fn patched(mut self, patch: &LessonPatch, now: DateTime<Utc>) -> Self {
    if let Some(id) = patch.student_id {
      self.student_id = id;
    }
    if let Some(id) = patch.instructor_id {
      self.instructor_id = id;
    }
    if let Some(course) = patch.course_id {
      self.course_id = course;
    }
    if let Some(aircraft) = patch.aircraft_id {
      self.aircraft_id = aircraft;
    }
    if let Some(date) = patch.date {
      self.date = date;
    }
    if let Some(duration) = patch.duration {
      self.duration = duration;
    }
    if let Some(topic) = &patch.topic {
      self.topic = non_blank(topic.clone());
    }
    if let Some(remarks) = &patch.remarks {
      self.remarks = non_blank(remarks.clone());
    }
    match patch.status {
      Some(status) => apply_transition(self, status, now),
      None => self,
    }
  }
}

/// Input to [`crate::store::CaseStore::create_lesson`].
#[derive(Debug, Clone)]
pub struct NewLesson {
  pub student_id:    Uuid,
  pub instructor_id: Uuid,
  pub course_id:     Option<Uuid>,
  pub aircraft_id:   Option<Uuid>,
  pub date:          NaiveDate,
  pub duration:      Hours,
  pub topic:         Option<String>,
  pub remarks:       Option<String>,
  pub status:        LessonStatus,
  pub comment:       Option<String>,
}

impl NewLesson {
  /// A planned lesson with no course, aircraft, or notes.
  pub fn new(student_id: Uuid, instructor_id: Uuid, date: NaiveDate, duration: Hours) -> Self {
    Self {
      student_id,
      instructor_id,
      course_id: None,
      aircraft_id: None,
      date,
      duration,
      topic: None,
      remarks: None,
      status: LessonStatus::default(),
      comment: None,
    }
  }
}

/// Partial update for a lesson. For clearable fields the outer `Option` is
/// "present in the patch" and the inner one the new value.
#[derive(Debug, Clone, Default)]
pub struct LessonPatch {
  pub student_id:       Option<Uuid>,
  pub instructor_id:    Option<Uuid>,
  pub course_id:        Option<Option<Uuid>>,
  pub aircraft_id:      Option<Option<Uuid>>,
  pub date:             Option<NaiveDate>,
  pub duration:         Option<Hours>,
  pub topic:            Option<Option<String>>,
  pub remarks:          Option<Option<String>>,
  pub status:           Option<LessonStatus>,
  pub expected_version: Option<u32>,
}

impl LessonPatch {
  pub fn status(status: LessonStatus) -> Self {
    Self { status: Some(status), ..Self::default() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lesson() -> Lesson {
    Lesson {
      lesson_id:     Uuid::new_v4(),
      student_id:    Uuid::new_v4(),
      instructor_id: Uuid::new_v4(),
      course_id:     Some(Uuid::new_v4()),
      aircraft_id:   None,
      date:          NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
      duration:      Hours::new(1.5).unwrap(),
      topic:         Some("circuits".into()),
      remarks:       None,
      status:        LessonStatus::Planned,
      version:       1,
    }
  }

  #[test]
  fn patch_can_clear_optional_fields() {
    let patch = LessonPatch {
      course_id: Some(None),
      topic: Some(Some("  ".into())),
      ..Default::default()
    };
    let out = lesson().patched(&patch, Utc::now());
    assert_eq!(out.course_id, None);
    assert_eq!(out.topic, None);
  }

  #[test]
  fn absent_fields_untouched() {
    let before = lesson();
    let out = before.clone().patched(&LessonPatch::status(LessonStatus::Completed), Utc::now());
    assert_eq!(out.status, LessonStatus::Completed);
    assert_eq!(out.course_id, before.course_id);
    assert_eq!(out.topic, before.topic);
    assert_eq!(out.duration, before.duration);
  }
}
