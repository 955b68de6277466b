//! Integration tests for `SqliteStore` against an in-memory database.

use casework_core::{
  EntityKind,
  application::{ApplicationPatch, NewApplication},
  directory::{MigrantPatch, NewMigrant, NewOfficer, OfficerPatch},
  exam::{ExamPatch, NewExam},
  lesson::{LessonPatch, NewLesson},
  school::{
    AircraftPatch, CertificatePatch, CoursePatch, InstructorPatch, NewAircraft, NewCertificate,
    NewCourse, NewInstructor, NewStudent, NewStudentCertificate, StudentCertificatePatch,
    StudentPatch,
  },
  status::{ApplicationStatus, CertificateStatus, LessonStatus},
  store::{
    ApplicationQuery, ApplicationSortKey, CaseStore, CourseQuery, ExamQuery, LessonQuery,
    LessonSortKey, SEARCH_LIMIT, SearchResults, Sort, StudentCertificateQuery,
  },
  validate::Hours,
};
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn domain(err: Error) -> casework_core::Error {
  match err {
    Error::Core(e) => e,
    other => panic!("expected a domain error, got {other:?}"),
  }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn migrant(name: &str) -> NewMigrant {
  NewMigrant {
    full_name:       name.into(),
    passport_number: "4509 123456".into(),
    birth_date:      Some(date(1990, 5, 17)),
    address:         None,
    gender:          "F".into(),
    phone_number:    "+7 912 555 01 02".into(),
  }
}

fn officer(login: &str) -> NewOfficer {
  NewOfficer {
    full_name: "Irina Sokolova".into(),
    position:  Some("inspector".into()),
    email:     None,
    login:     login.into(),
  }
}

/// A store with one migrant and one officer; returns their ids.
async fn desk() -> (SqliteStore, Uuid, Uuid) {
  let s = store().await;
  let m = s.add_migrant(migrant("Anna Petrova")).await.unwrap();
  let o = s.add_officer(officer("isokolova")).await.unwrap();
  (s, m.migrant_id, o.officer_id)
}

/// A store with one student and one instructor; returns their ids.
async fn school() -> (SqliteStore, Uuid, Uuid) {
  let s = store().await;
  let st = s.add_student(NewStudent::named("Pavel Orlov")).await.unwrap();
  let ins = s.add_instructor(NewInstructor::named("Oleg Vasin")).await.unwrap();
  (s, st.student_id, ins.instructor_id)
}

fn hours(h: f64) -> Hours { Hours::new(h).unwrap() }

// ─── Application lifecycle ───────────────────────────────────────────────────

#[tokio::test]
async fn approval_round_trip_scenario() {
  let (s, m, o) = desk().await;
  let app = s
    .create_application(NewApplication::new(m, o, "work permit"))
    .await
    .unwrap();
  assert_eq!(app.status, ApplicationStatus::Pending);
  assert_eq!(app.version, 1);

  let history = s.application_history(app.application_id).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].status, ApplicationStatus::Pending);
  assert_eq!(history[0].previous, None);

  let approved = s
    .update_application(
      app.application_id,
      ApplicationPatch::status(ApplicationStatus::Approved),
      None,
    )
    .await
    .unwrap();
  assert!(approved.decision_date.is_some());
  let history = s.application_history(app.application_id).await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[1].status, ApplicationStatus::Approved);
  assert_eq!(history[1].previous, Some(ApplicationStatus::Pending));
  assert_eq!(
    history[1].comment.as_deref(),
    Some("Status changed from Pending to Approved")
  );

  let reopened = s
    .update_application(
      app.application_id,
      ApplicationPatch::status(ApplicationStatus::Pending),
      None,
    )
    .await
    .unwrap();
  assert_eq!(reopened.decision_date, None);
  assert_eq!(s.application_history(app.application_id).await.unwrap().len(), 3);

  let again = s
    .update_application(
      app.application_id,
      ApplicationPatch::status(ApplicationStatus::Pending),
      Some("no-op".into()),
    )
    .await
    .unwrap();
  assert_eq!(again.version, 4);
  assert_eq!(s.application_history(app.application_id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn created_application_reads_back_equal() {
  let (s, m, o) = desk().await;
  let app = s
    .create_application(NewApplication::new(m, o, "  residence permit "))
    .await
    .unwrap();
  assert_eq!(app.kind, "residence permit");

  let fetched = s.get_application(app.application_id).await.unwrap();
  assert_eq!(fetched, Some(app));
}

#[tokio::test]
async fn initial_record_carries_creation_status_and_comment() {
  let (s, m, o) = desk().await;
  let mut input = NewApplication::new(m, o, "citizenship");
  input.status = ApplicationStatus::InProgress;
  input.comment = Some("walk-in".into());
  let app = s.create_application(input).await.unwrap();

  let history = s.application_history(app.application_id).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].status, ApplicationStatus::InProgress);
  assert_eq!(history[0].comment.as_deref(), Some("walk-in"));
  assert_eq!(history[0].changed_at, app.submitted_at);
}

#[tokio::test]
async fn created_as_decided_is_stamped() {
  let (s, m, o) = desk().await;
  let mut input = NewApplication::new(m, o, "visa extension");
  input.status = ApplicationStatus::Rejected;
  let app = s.create_application(input).await.unwrap();
  assert_eq!(app.decision_date, Some(app.submitted_at));
}

#[tokio::test]
async fn repeated_decision_keeps_original_date() {
  let (s, m, o) = desk().await;
  let app = s
    .create_application(NewApplication::new(m, o, "work permit"))
    .await
    .unwrap();
  let id = app.application_id;

  let first = s
    .update_application(id, ApplicationPatch::status(ApplicationStatus::Approved), None)
    .await
    .unwrap();
  let second = s
    .update_application(id, ApplicationPatch::status(ApplicationStatus::Approved), None)
    .await
    .unwrap();
  assert_eq!(first.decision_date, second.decision_date);
  assert_eq!(s.application_history(id).await.unwrap().len(), 2);

  let rejected = s
    .update_application(id, ApplicationPatch::status(ApplicationStatus::Rejected), None)
    .await
    .unwrap();
  assert!(rejected.decision_date >= first.decision_date);

  let working = s
    .update_application(id, ApplicationPatch::status(ApplicationStatus::InProgress), None)
    .await
    .unwrap();
  assert_eq!(working.decision_date, None);
}

#[tokio::test]
async fn history_is_chronological_and_ends_at_current_status() {
  let (s, m, o) = desk().await;
  let app = s
    .create_application(NewApplication::new(m, o, "work permit"))
    .await
    .unwrap();
  let id = app.application_id;
  for status in [
    ApplicationStatus::InProgress,
    ApplicationStatus::Approved,
    ApplicationStatus::Pending,
    ApplicationStatus::Rejected,
  ] {
    s.update_application(id, ApplicationPatch::status(status), Some(format!("to {status}")))
      .await
      .unwrap();
  }

  let history = s.application_history(id).await.unwrap();
  assert_eq!(history.len(), 5);
  assert!(history.windows(2).all(|w| w[0].changed_at <= w[1].changed_at));
  assert!(history.windows(2).all(|w| w[1].previous == Some(w[0].status)));
  let current = s.get_application(id).await.unwrap().unwrap();
  assert_eq!(history.last().unwrap().status, current.status);
  assert_eq!(history[4].comment.as_deref(), Some("to Rejected"));
}

#[tokio::test]
async fn non_status_edit_records_nothing() {
  let (s, m, o) = desk().await;
  let other = s.add_officer(officer("avolkov")).await.unwrap();
  let app = s
    .create_application(NewApplication::new(m, o, "work permit"))
    .await
    .unwrap();

  let patch = ApplicationPatch {
    officer_id: Some(other.officer_id),
    kind: Some("work permit (renewal)".into()),
    ..Default::default()
  };
  let updated = s.update_application(app.application_id, patch, None).await.unwrap();
  assert_eq!(updated.officer_id, other.officer_id);
  assert_eq!(updated.kind, "work permit (renewal)");
  assert_eq!(updated.version, 2);
  assert_eq!(s.application_history(app.application_id).await.unwrap().len(), 1);
}

// ─── Application failures ────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_parties_are_validation_errors() {
  let (s, m, _) = desk().await;
  let err = s
    .create_application(NewApplication::new(m, Uuid::new_v4(), "work permit"))
    .await
    .unwrap_err();
  match domain(err) {
    casework_core::Error::Validation(errors) => {
      assert!(errors.has("officer_id"));
      assert!(!errors.has("migrant_id"));
    }
    other => panic!("expected validation error, got {other:?}"),
  }
  let all = s.list_applications(&ApplicationQuery::default()).await.unwrap();
  assert!(all.is_empty());
}

#[tokio::test]
async fn blank_kind_is_rejected() {
  let (s, m, o) = desk().await;
  let err = s
    .create_application(NewApplication::new(m, o, "   "))
    .await
    .unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("kind")));
}

#[tokio::test]
async fn update_missing_application_is_not_found() {
  let (s, ..) = desk().await;
  let id = Uuid::new_v4();
  let err = s
    .update_application(id, ApplicationPatch::status(ApplicationStatus::Approved), None)
    .await
    .unwrap_err();
  assert!(matches!(
    domain(err),
    casework_core::Error::NotFound { kind: EntityKind::Application, id: missing } if missing == id
  ));
}

#[tokio::test]
async fn stale_version_is_rejected_without_side_effects() {
  let (s, m, o) = desk().await;
  let app = s
    .create_application(NewApplication::new(m, o, "work permit"))
    .await
    .unwrap();
  let id = app.application_id;
  s.update_application(id, ApplicationPatch::status(ApplicationStatus::InProgress), None)
    .await
    .unwrap();

  let stale = ApplicationPatch {
    status: Some(ApplicationStatus::Approved),
    expected_version: Some(1),
    ..Default::default()
  };
  let err = s.update_application(id, stale, None).await.unwrap_err();
  assert!(matches!(
    domain(err),
    casework_core::Error::VersionConflict { expected: 1, actual: 2, .. }
  ));

  let current = s.get_application(id).await.unwrap().unwrap();
  assert_eq!(current.status, ApplicationStatus::InProgress);
  assert_eq!(current.decision_date, None);
  assert_eq!(s.application_history(id).await.unwrap().len(), 2);

  let fresh = ApplicationPatch {
    status: Some(ApplicationStatus::Approved),
    expected_version: Some(2),
    ..Default::default()
  };
  assert_eq!(s.update_application(id, fresh, None).await.unwrap().version, 3);
}

#[tokio::test]
async fn failed_update_rolls_back_everything() {
  let (s, m, o) = desk().await;
  let app = s
    .create_application(NewApplication::new(m, o, "work permit"))
    .await
    .unwrap();
  let patch = ApplicationPatch {
    officer_id: Some(Uuid::new_v4()),
    status: Some(ApplicationStatus::Approved),
    ..Default::default()
  };
  assert!(s.update_application(app.application_id, patch, None).await.is_err());

  let current = s.get_application(app.application_id).await.unwrap().unwrap();
  assert_eq!(current, app);
  assert_eq!(s.application_history(app.application_id).await.unwrap().len(), 1);
}

// ─── Deletes ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_application_takes_its_history() {
  let (s, m, o) = desk().await;
  let app = s
    .create_application(NewApplication::new(m, o, "work permit"))
    .await
    .unwrap();
  s.update_application(
    app.application_id,
    ApplicationPatch::status(ApplicationStatus::Approved),
    None,
  )
  .await
  .unwrap();

  assert!(s.delete_application(app.application_id).await.unwrap());
  assert!(s.get_application(app.application_id).await.unwrap().is_none());
  assert!(s.application_history(app.application_id).await.unwrap().is_empty());
  assert!(!s.delete_application(app.application_id).await.unwrap());
}

#[tokio::test]
async fn migrant_with_applications_cannot_be_deleted() {
  let (s, m, o) = desk().await;
  let app = s
    .create_application(NewApplication::new(m, o, "work permit"))
    .await
    .unwrap();

  let err = s.delete_migrant(m).await.unwrap_err();
  match domain(err) {
    casework_core::Error::InUse { kind, dependents, .. } => {
      assert_eq!(kind, EntityKind::Migrant);
      assert_eq!(dependents, vec!["applications"]);
    }
    other => panic!("expected in-use error, got {other:?}"),
  }
  assert!(s.get_migrant(m).await.unwrap().is_some());
  assert!(matches!(
    domain(s.delete_officer(o).await.unwrap_err()),
    casework_core::Error::InUse { .. }
  ));

  s.delete_application(app.application_id).await.unwrap();
  assert!(s.delete_migrant(m).await.unwrap());
  assert!(s.delete_officer(o).await.unwrap());
}

#[tokio::test]
async fn course_delete_reports_every_blocking_kind() {
  let (s, _, instructor) = school().await;
  let course = s.add_course(NewCourse::named("PPL(A)")).await.unwrap();
  let mut student = NewStudent::named("Maria Gromova");
  student.course_id = Some(course.course_id);
  let student = s.add_student(student).await.unwrap();
  let mut template = NewCertificate::titled("PPL(A) licence");
  template.course_id = Some(course.course_id);
  s.add_certificate(template).await.unwrap();
  let mut lesson = NewLesson::new(student.student_id, instructor, date(2026, 4, 1), hours(1.0));
  lesson.course_id = Some(course.course_id);
  s.create_lesson(lesson).await.unwrap();
  s.add_exam(NewExam::new(student.student_id, course.course_id, date(2026, 5, 20)))
    .await
    .unwrap();

  let err = s.delete_course(course.course_id).await.unwrap_err();
  match domain(err) {
    casework_core::Error::InUse { dependents, .. } => {
      assert_eq!(dependents, vec!["students", "lessons", "exams", "certificates"]);
    }
    other => panic!("expected in-use error, got {other:?}"),
  }
}

#[tokio::test]
async fn delete_missing_reports_false() {
  let s = store().await;
  assert!(!s.delete_migrant(Uuid::new_v4()).await.unwrap());
  assert!(!s.delete_course(Uuid::new_v4()).await.unwrap());
  assert!(!s.delete_lesson(Uuid::new_v4()).await.unwrap());
  assert!(!s.delete_student_certificate(Uuid::new_v4()).await.unwrap());
}

// ─── Application queries ─────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_by_status_set_and_text() {
  let (s, m, o) = desk().await;
  let other = s.add_migrant(migrant("Иван Петров")).await.unwrap();
  let a = s
    .create_application(NewApplication::new(m, o, "work permit"))
    .await
    .unwrap();
  let b = s
    .create_application(NewApplication::new(other.migrant_id, o, "residence permit"))
    .await
    .unwrap();
  let c = s
    .create_application(NewApplication::new(other.migrant_id, o, "citizenship"))
    .await
    .unwrap();
  s.update_application(b.application_id, ApplicationPatch::status(ApplicationStatus::Approved), None)
    .await
    .unwrap();
  s.update_application(c.application_id, ApplicationPatch::status(ApplicationStatus::Rejected), None)
    .await
    .unwrap();

  let decided = s
    .list_applications(&ApplicationQuery {
      statuses: vec![ApplicationStatus::Approved, ApplicationStatus::Rejected],
      ..Default::default()
    })
    .await
    .unwrap();
  let ids: Vec<Uuid> = decided.iter().map(|x| x.application_id).collect();
  assert_eq!(ids.len(), 2);
  assert!(ids.contains(&b.application_id) && ids.contains(&c.application_id));

  let by_name = s
    .list_applications(&ApplicationQuery { text: Some("ПЕТРОВ".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_name.len(), 2);
  assert!(by_name.iter().all(|x| x.migrant_id == other.migrant_id));

  let by_kind = s
    .list_applications(&ApplicationQuery {
      text: Some("PERMIT".into()),
      migrant_id: Some(m),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_kind.len(), 1);
  assert_eq!(by_kind[0].application_id, a.application_id);
}

#[tokio::test]
async fn list_respects_submission_window() {
  let (s, m, o) = desk().await;
  let first = s
    .create_application(NewApplication::new(m, o, "work permit"))
    .await
    .unwrap();
  s.create_application(NewApplication::new(m, o, "residence permit"))
    .await
    .unwrap();

  let before = s
    .list_applications(&ApplicationQuery {
      submitted_to: Some(first.submitted_at - Duration::seconds(1)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(before.is_empty());

  let from_first = s
    .list_applications(&ApplicationQuery {
      submitted_from: Some(first.submitted_at),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(from_first.len(), 2);

  let up_to_first = s
    .list_applications(&ApplicationQuery {
      submitted_to: Some(first.submitted_at),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(up_to_first.iter().any(|x| x.application_id == first.application_id));
}

#[tokio::test]
async fn sorting_by_status_and_decision_date() {
  let (s, m, o) = desk().await;
  for status in [
    ApplicationStatus::Approved,
    ApplicationStatus::Pending,
    ApplicationStatus::Rejected,
    ApplicationStatus::InProgress,
  ] {
    let mut input = NewApplication::new(m, o, "work permit");
    input.status = status;
    s.create_application(input).await.unwrap();
  }

  let by_status = s
    .list_applications(&ApplicationQuery {
      sort: Some(Sort::desc(ApplicationSortKey::Status)),
      ..Default::default()
    })
    .await
    .unwrap();
  let statuses: Vec<ApplicationStatus> = by_status.iter().map(|x| x.status).collect();
  assert_eq!(statuses, vec![
    ApplicationStatus::Rejected,
    ApplicationStatus::Approved,
    ApplicationStatus::InProgress,
    ApplicationStatus::Pending,
  ]);

  let by_decision = s
    .list_applications(&ApplicationQuery {
      sort: Some(Sort::asc(ApplicationSortKey::DecisionDate)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(by_decision[0].decision_date.is_none());
  assert!(by_decision[1].decision_date.is_none());
  assert!(by_decision[2].decision_date.is_some());
  assert!(by_decision[3].decision_date.is_some());
  assert!(
    by_decision[0].application_id < by_decision[1].application_id,
    "ties break by id"
  );
}

#[tokio::test]
async fn paging_applies_after_filtering() {
  let (s, m, o) = desk().await;
  for kind in ["a", "b", "c", "d", "e"] {
    s.create_application(NewApplication::new(m, o, format!("permit {kind}")))
      .await
      .unwrap();
  }
  let all = s.list_applications(&ApplicationQuery::default()).await.unwrap();
  let page = s
    .list_applications(&ApplicationQuery {
      text: Some("permit".into()),
      offset: Some(1),
      limit: Some(2),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page.len(), 2);
  assert_eq!(page[0].application_id, all[1].application_id);
  assert_eq!(page[1].application_id, all[2].application_id);
}

// ─── Lessons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn lesson_history_tracks_transitions() {
  let (s, student, instructor) = school().await;
  let mut input = NewLesson::new(student, instructor, date(2026, 3, 14), hours(1.5));
  input.topic = Some("circuits".into());
  let lesson = s.create_lesson(input).await.unwrap();
  assert_eq!(lesson.status, LessonStatus::Planned);

  let history = s.lesson_history(lesson.lesson_id).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].status, LessonStatus::Planned);

  let done = s
    .update_lesson(
      lesson.lesson_id,
      LessonPatch::status(LessonStatus::Completed),
      Some("good landings".into()),
    )
    .await
    .unwrap();
  assert_eq!(done.status, LessonStatus::Completed);
  assert_eq!(done.version, 2);

  let history = s.lesson_history(lesson.lesson_id).await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[1].previous, Some(LessonStatus::Planned));
  assert_eq!(history[1].comment.as_deref(), Some("good landings"));

  s.update_lesson(lesson.lesson_id, LessonPatch::status(LessonStatus::Completed), None)
    .await
    .unwrap();
  assert_eq!(s.lesson_history(lesson.lesson_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn lesson_patch_clears_and_checks_references() {
  let (s, student, instructor) = school().await;
  let aircraft = s.add_aircraft(NewAircraft::tail("RA-1234G")).await.unwrap();
  let mut input = NewLesson::new(student, instructor, date(2026, 3, 14), hours(2.0));
  input.aircraft_id = Some(aircraft.aircraft_id);
  let lesson = s.create_lesson(input).await.unwrap();

  let bad = LessonPatch { aircraft_id: Some(Some(Uuid::new_v4())), ..Default::default() };
  let err = s.update_lesson(lesson.lesson_id, bad, None).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("aircraft_id")));

  let clear = LessonPatch { aircraft_id: Some(None), ..Default::default() };
  let updated = s.update_lesson(lesson.lesson_id, clear, None).await.unwrap();
  assert_eq!(updated.aircraft_id, None);
  assert_eq!(s.get_lesson(lesson.lesson_id).await.unwrap(), Some(updated));
  assert!(s.delete_aircraft(aircraft.aircraft_id).await.unwrap());
}

#[tokio::test]
async fn lesson_queries_filter_and_sort() {
  let (s, student, instructor) = school().await;
  for (day, h, status) in [
    (1, 1.0, LessonStatus::Completed),
    (5, 2.5, LessonStatus::Planned),
    (9, 0.5, LessonStatus::Planned),
    (20, 3.0, LessonStatus::Cancelled),
  ] {
    let mut input = NewLesson::new(student, instructor, date(2026, 4, day), hours(h));
    input.status = status;
    input.remarks = Some(format!("day {day}"));
    s.create_lesson(input).await.unwrap();
  }

  let window = s
    .list_lessons(&LessonQuery {
      date_from: Some(date(2026, 4, 5)),
      date_to: Some(date(2026, 4, 20)),
      sort: Some(Sort::desc(LessonSortKey::Duration)),
      ..Default::default()
    })
    .await
    .unwrap();
  let durations: Vec<f64> = window.iter().map(|l| l.duration.get()).collect();
  assert_eq!(durations, vec![3.0, 2.5, 0.5]);

  let planned = s
    .list_lessons(&LessonQuery { statuses: vec![LessonStatus::Planned], ..Default::default() })
    .await
    .unwrap();
  let days: Vec<NaiveDate> = planned.iter().map(|l| l.date).collect();
  assert_eq!(days, vec![date(2026, 4, 5), date(2026, 4, 9)]);

  let text = s
    .list_lessons(&LessonQuery { text: Some("DAY 20".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(text.len(), 1);
  assert_eq!(text[0].status, LessonStatus::Cancelled);
}

#[tokio::test]
async fn lesson_delete_cascades_and_unblocks_student() {
  let (s, student, instructor) = school().await;
  let lesson = s
    .create_lesson(NewLesson::new(student, instructor, date(2026, 3, 1), hours(1.0)))
    .await
    .unwrap();
  assert!(matches!(
    domain(s.delete_student(student).await.unwrap_err()),
    casework_core::Error::InUse { .. }
  ));
  assert!(matches!(
    domain(s.delete_instructor(instructor).await.unwrap_err()),
    casework_core::Error::InUse { .. }
  ));

  assert!(s.delete_lesson(lesson.lesson_id).await.unwrap());
  assert!(s.lesson_history(lesson.lesson_id).await.unwrap().is_empty());
  assert!(s.delete_student(student).await.unwrap());
  assert!(s.delete_instructor(instructor).await.unwrap());
}

#[tokio::test]
async fn lesson_needs_existing_student_and_instructor() {
  let s = store().await;
  let err = s
    .create_lesson(NewLesson::new(Uuid::new_v4(), Uuid::new_v4(), date(2026, 3, 1), hours(1.0)))
    .await
    .unwrap_err();
  match domain(err) {
    casework_core::Error::Validation(errors) => {
      assert!(errors.has("student_id"));
      assert!(errors.has("instructor_id"));
    }
    other => panic!("expected validation error, got {other:?}"),
  }
}

// ─── Reference data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn unique_keys_are_validation_errors() {
  let s = store().await;
  s.add_officer(officer("isokolova")).await.unwrap();
  let err = s.add_officer(officer(" isokolova ")).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("login")));

  s.add_aircraft(NewAircraft::tail("RA-1234G")).await.unwrap();
  let err = s.add_aircraft(NewAircraft::tail("RA-1234G")).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("tail_number")));

  let mut a = NewStudent::named("Pavel Orlov");
  a.email = Some("orlov@example.org".into());
  s.add_student(a.clone()).await.unwrap();
  a.full_name = "Pavel Orlov Jr".into();
  let err = s.add_student(a).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("email")));
}

#[tokio::test]
async fn migrant_search_and_lookup() {
  let s = store().await;
  let anna = s.add_migrant(migrant("Anna Petrova")).await.unwrap();
  s.add_migrant(migrant("Boris Kim")).await.unwrap();

  assert_eq!(s.get_migrant(anna.migrant_id).await.unwrap(), Some(anna.clone()));
  assert!(s.get_migrant(Uuid::new_v4()).await.unwrap().is_none());

  let all = s.list_migrants(None).await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].full_name, "Anna Petrova");

  let hits = s.list_migrants(Some("petrova".into())).await.unwrap();
  assert_eq!(hits, vec![anna]);
}

#[tokio::test]
async fn course_listing_filters() {
  let s = store().await;
  s.add_course(NewCourse::named("PPL(A)")).await.unwrap();
  let mut retired = NewCourse::named("Night rating");
  retired.is_active = false;
  retired.category = Some("ratings".into());
  s.add_course(retired).await.unwrap();

  let active = s
    .list_courses(&CourseQuery { only_active: true, ..Default::default() })
    .await
    .unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].name, "PPL(A)");

  let ratings = s
    .list_courses(&CourseQuery { text: Some("RATINGS".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(ratings.len(), 1);
  assert!(!ratings[0].is_active);
}

#[tokio::test]
async fn student_needs_existing_course() {
  let s = store().await;
  let mut input = NewStudent::named("Pavel Orlov");
  input.course_id = Some(Uuid::new_v4());
  let err = s.add_student(input).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("course_id")));
  assert!(s.list_students(None, None).await.unwrap().is_empty());
}

// ─── Certificates ────────────────────────────────────────────────────────────

#[tokio::test]
async fn issuance_derives_expiry_from_template() {
  let (s, student, _) = school().await;
  let mut template = NewCertificate::titled("Radio operator");
  template.default_validity_days = Some(365);
  let template = s.add_certificate(template).await.unwrap();

  let mut input = NewStudentCertificate::new(student, template.certificate_id);
  input.issued_on = Some(date(2026, 1, 10));
  let issued = s.issue_certificate(input).await.unwrap();
  assert_eq!(issued.valid_until, Some(date(2027, 1, 10)));
  assert_eq!(issued.status, CertificateStatus::Active);

  let mut explicit = NewStudentCertificate::new(student, template.certificate_id);
  explicit.issued_on = Some(date(2026, 1, 10));
  explicit.valid_until = Some(date(2026, 6, 30));
  let issued = s.issue_certificate(explicit).await.unwrap();
  assert_eq!(issued.valid_until, Some(date(2026, 6, 30)));
  assert_eq!(s.get_student_certificate(issued.student_certificate_id).await.unwrap(), Some(issued));
}

#[tokio::test]
async fn issuance_defaults_to_today() {
  let (s, student, _) = school().await;
  let template = s.add_certificate(NewCertificate::titled("English proficiency")).await.unwrap();
  let issued = s
    .issue_certificate(NewStudentCertificate::new(student, template.certificate_id))
    .await
    .unwrap();
  assert_eq!(issued.issued_on, chrono::Utc::now().date_naive());
  assert_eq!(issued.valid_until, None);
}

#[tokio::test]
async fn issuance_rejects_unknown_template_and_bad_window() {
  let (s, student, _) = school().await;
  let err = s
    .issue_certificate(NewStudentCertificate::new(student, Uuid::new_v4()))
    .await
    .unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("certificate_id")));

  let template = s.add_certificate(NewCertificate::titled("PPL(A)")).await.unwrap();
  let mut input = NewStudentCertificate::new(student, template.certificate_id);
  input.issued_on = Some(date(2026, 2, 1));
  input.valid_until = Some(date(2026, 1, 1));
  let err = s.issue_certificate(input).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("valid_until")));
}

#[tokio::test]
async fn issued_certificates_block_and_filter() {
  let (s, student, _) = school().await;
  let course = s.add_course(NewCourse::named("PPL(A)")).await.unwrap();
  let mut licence = NewCertificate::titled("PPL(A) licence");
  licence.course_id = Some(course.course_id);
  let licence = s.add_certificate(licence).await.unwrap();
  let radio = s.add_certificate(NewCertificate::titled("Radio operator")).await.unwrap();

  let mut first = NewStudentCertificate::new(student, licence.certificate_id);
  first.issued_on = Some(date(2026, 1, 1));
  first.number = Some("PPL-0042".into());
  let first = s.issue_certificate(first).await.unwrap();
  let mut second = NewStudentCertificate::new(student, radio.certificate_id);
  second.issued_on = Some(date(2026, 2, 1));
  let second = s.issue_certificate(second).await.unwrap();

  let all = s
    .list_student_certificates(&StudentCertificateQuery::default())
    .await
    .unwrap();
  let order: Vec<Uuid> = all.iter().map(|c| c.student_certificate_id).collect();
  assert_eq!(order, vec![second.student_certificate_id, first.student_certificate_id]);

  let by_course = s
    .list_student_certificates(&StudentCertificateQuery {
      course_id: Some(course.course_id),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_course, vec![first.clone()]);

  let by_title = s
    .list_student_certificates(&StudentCertificateQuery {
      text: Some("radio".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_title, vec![second.clone()]);

  let by_number = s
    .list_student_certificates(&StudentCertificateQuery {
      text: Some("ppl-0042".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_number.len(), 1);

  let err = s.delete_certificate(licence.certificate_id).await.unwrap_err();
  assert!(matches!(
    domain(err),
    casework_core::Error::InUse { kind: EntityKind::Certificate, .. }
  ));
  assert!(matches!(
    domain(s.delete_student(student).await.unwrap_err()),
    casework_core::Error::InUse { .. }
  ));

  assert!(s.delete_student_certificate(first.student_certificate_id).await.unwrap());
  assert!(s.delete_certificate(licence.certificate_id).await.unwrap());
}

#[tokio::test]
async fn certificate_status_updates() {
  let (s, student, _) = school().await;
  let template = s.add_certificate(NewCertificate::titled("PPL(A)")).await.unwrap();
  let issued = s
    .issue_certificate(NewStudentCertificate::new(student, template.certificate_id))
    .await
    .unwrap();

  let revoked = s
    .set_student_certificate_status(issued.student_certificate_id, CertificateStatus::Revoked)
    .await
    .unwrap();
  assert_eq!(revoked.status, CertificateStatus::Revoked);

  let only_revoked = s
    .list_student_certificates(&StudentCertificateQuery {
      status: Some(CertificateStatus::Revoked),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(only_revoked, vec![revoked]);

  let err = s
    .set_student_certificate_status(Uuid::new_v4(), CertificateStatus::Active)
    .await
    .unwrap_err();
  assert!(matches!(
    domain(err),
    casework_core::Error::NotFound { kind: EntityKind::StudentCertificate, .. }
  ));
}

// ─── Reference updates ───────────────────────────────────────────────────────

#[tokio::test]
async fn migrant_update_replaces_and_clears_fields() {
  let s = store().await;
  let mut input = migrant("Anna Petrova");
  input.address = Some("Kazan, Baumana 12".into());
  let anna = s.add_migrant(input).await.unwrap();

  let patch = MigrantPatch {
    full_name: Some(" Anna Smirnova ".into()),
    address: Some(None),
    ..Default::default()
  };
  let updated = s.update_migrant(anna.migrant_id, patch).await.unwrap();
  assert_eq!(updated.full_name, "Anna Smirnova");
  assert_eq!(updated.address, None);
  assert_eq!(updated.passport_number, anna.passport_number);
  assert_eq!(s.get_migrant(anna.migrant_id).await.unwrap(), Some(updated));

  let bad = MigrantPatch { phone_number: Some("call me".into()), ..Default::default() };
  let err = s.update_migrant(anna.migrant_id, bad).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("phone_number")));

  let err = s
    .update_migrant(Uuid::new_v4(), MigrantPatch::default())
    .await
    .unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::NotFound { kind: EntityKind::Migrant, .. }));
}

#[tokio::test]
async fn officer_login_stays_unique_across_updates() {
  let s = store().await;
  let first = s.add_officer(officer("isokolova")).await.unwrap();
  let second = s.add_officer(officer("dkuznetsov")).await.unwrap();

  let keep = OfficerPatch { login: Some("isokolova".into()), ..Default::default() };
  let same = s.update_officer(first.officer_id, keep).await.unwrap();
  assert_eq!(same.login, "isokolova");

  let steal = OfficerPatch { login: Some("isokolova".into()), ..Default::default() };
  let err = s.update_officer(second.officer_id, steal).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("login")));
  assert_eq!(
    s.get_officer(second.officer_id).await.unwrap().unwrap().login,
    "dkuznetsov"
  );
}

#[tokio::test]
async fn student_update_rechecks_email_and_course() {
  let s = store().await;
  let course = s.add_course(NewCourse::named("PPL(A)")).await.unwrap();
  let mut a = NewStudent::named("Pavel Orlov");
  a.email = Some("orlov@example.org".into());
  let pavel = s.add_student(a).await.unwrap();
  let maria = s.add_student(NewStudent::named("Maria Gromova")).await.unwrap();

  let taken = StudentPatch { email: Some(Some("orlov@example.org".into())), ..Default::default() };
  let err = s.update_student(maria.student_id, taken).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("email")));

  let ghost = StudentPatch { course_id: Some(Some(Uuid::new_v4())), ..Default::default() };
  let err = s.update_student(maria.student_id, ghost).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("course_id")));

  let enrol = StudentPatch {
    course_id: Some(Some(course.course_id)),
    enrolled_on: Some(Some(date(2026, 2, 1))),
    ..Default::default()
  };
  let enrolled = s.update_student(maria.student_id, enrol).await.unwrap();
  assert_eq!(enrolled.course_id, Some(course.course_id));
  let own = StudentPatch { email: Some(Some("orlov@example.org".into())), ..Default::default() };
  assert!(s.update_student(pavel.student_id, own).await.is_ok());

  let in_course = s.list_students(None, Some(course.course_id)).await.unwrap();
  assert_eq!(in_course, vec![enrolled]);
}

#[tokio::test]
async fn course_and_instructor_updates() {
  let s = store().await;
  let course = s.add_course(NewCourse::named("PPL(A)")).await.unwrap();
  let patch = CoursePatch {
    is_active: Some(false),
    required_hours: Some(Some(45.0)),
    category: Some(Some("licences".into())),
    ..Default::default()
  };
  let retired = s.update_course(course.course_id, patch).await.unwrap();
  assert!(!retired.is_active);
  assert_eq!(retired.required_hours, Some(45.0));
  let active = s
    .list_courses(&CourseQuery { only_active: true, ..Default::default() })
    .await
    .unwrap();
  assert!(active.is_empty());

  let oleg = s.add_instructor(NewInstructor::named("Oleg Vasin")).await.unwrap();
  let patch = InstructorPatch { rank: Some(Some("CFI".into())), ..Default::default() };
  let ranked = s.update_instructor(oleg.instructor_id, patch).await.unwrap();
  assert_eq!(ranked.rank.as_deref(), Some("CFI"));
  let bad = InstructorPatch { full_name: Some("".into()), ..Default::default() };
  let err = s.update_instructor(oleg.instructor_id, bad).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("full_name")));
}

#[tokio::test]
async fn tail_number_update_checks_the_rest_of_the_fleet() {
  let s = store().await;
  let mut cessna = NewAircraft::tail("RA-1234G");
  cessna.model = Some("Cessna 172".into());
  let cessna = s.add_aircraft(cessna).await.unwrap();
  let piper = s.add_aircraft(NewAircraft::tail("RA-5678P")).await.unwrap();

  let clash = AircraftPatch { tail_number: Some("RA-1234G".into()), ..Default::default() };
  let err = s.update_aircraft(piper.aircraft_id, clash).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("tail_number")));

  let patch = AircraftPatch {
    status: Some(Some("in maintenance".into())),
    total_hours: Some(Some(5120.5)),
    ..Default::default()
  };
  let grounded = s.update_aircraft(cessna.aircraft_id, patch).await.unwrap();
  assert_eq!(grounded.status.as_deref(), Some("in maintenance"));
  assert_eq!(grounded.tail_number, "RA-1234G");

  let by_model = s.list_aircraft(Some("cessna".into())).await.unwrap();
  assert_eq!(by_model, vec![grounded]);
  assert_eq!(s.list_aircraft(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn instructor_listing_filters_by_name_or_email() {
  let s = store().await;
  let mut oleg = NewInstructor::named("Oleg Vasin");
  oleg.email = Some("vasin@aeroclub.example".into());
  s.add_instructor(oleg).await.unwrap();
  s.add_instructor(NewInstructor::named("Nina Belova")).await.unwrap();

  let hits = s.list_instructors(Some("AEROCLUB".into())).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].full_name, "Oleg Vasin");
  assert_eq!(s.list_instructors(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn template_update_keeps_issued_expiry() {
  let (s, student, _) = school().await;
  let mut template = NewCertificate::titled("Radio operator");
  template.default_validity_days = Some(30);
  let template = s.add_certificate(template).await.unwrap();
  let mut input = NewStudentCertificate::new(student, template.certificate_id);
  input.issued_on = Some(date(2026, 1, 1));
  let issued = s.issue_certificate(input).await.unwrap();

  let patch = CertificatePatch { default_validity_days: Some(Some(365)), ..Default::default() };
  let longer = s.update_certificate(template.certificate_id, patch).await.unwrap();
  assert_eq!(longer.default_validity_days, Some(365));
  let reread = s
    .get_student_certificate(issued.student_certificate_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(reread.valid_until, Some(date(2026, 1, 31)));

  let ghost = CertificatePatch { course_id: Some(Some(Uuid::new_v4())), ..Default::default() };
  let err = s.update_certificate(template.certificate_id, ghost).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("course_id")));
}

#[tokio::test]
async fn issued_certificate_edit_keeps_a_valid_window() {
  let (s, student, _) = school().await;
  let template = s.add_certificate(NewCertificate::titled("PPL(A)")).await.unwrap();
  let mut input = NewStudentCertificate::new(student, template.certificate_id);
  input.issued_on = Some(date(2026, 1, 1));
  input.valid_until = Some(date(2026, 12, 31));
  let issued = s.issue_certificate(input).await.unwrap();
  let id = issued.student_certificate_id;

  let late = StudentCertificatePatch { issued_on: Some(date(2027, 1, 1)), ..Default::default() };
  let err = s.update_student_certificate(id, late).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("valid_until")));
  assert_eq!(s.get_student_certificate(id).await.unwrap(), Some(issued));

  let patch = StudentCertificatePatch {
    number: Some(Some("PPL-0042".into())),
    status: Some(CertificateStatus::Suspended),
    notes: Some(Some("medical pending".into())),
    ..Default::default()
  };
  let edited = s.update_student_certificate(id, patch).await.unwrap();
  assert_eq!(edited.number.as_deref(), Some("PPL-0042"));
  assert_eq!(edited.status, CertificateStatus::Suspended);
  assert_eq!(s.get_student_certificate(id).await.unwrap(), Some(edited));

  let ghost = StudentCertificatePatch { student_id: Some(Uuid::new_v4()), ..Default::default() };
  let err = s.update_student_certificate(id, ghost).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("student_id")));
}

// ─── Exams ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn exam_crud_and_references() {
  let (s, student, instructor) = school().await;
  let course = s.add_course(NewCourse::named("PPL(A)")).await.unwrap();

  let err = s
    .add_exam(NewExam::new(Uuid::new_v4(), Uuid::new_v4(), date(2026, 5, 20)))
    .await
    .unwrap_err();
  match domain(err) {
    casework_core::Error::Validation(e) => {
      assert!(e.has("student_id"));
      assert!(e.has("course_id"));
    }
    other => panic!("expected validation error, got {other:?}"),
  }

  let mut input = NewExam::new(student, course.course_id, date(2026, 5, 20));
  input.instructor_id = Some(instructor);
  input.score = Some(87.5);
  input.result = Some(" passed ".into());
  let exam = s.add_exam(input).await.unwrap();
  assert_eq!(exam.result.as_deref(), Some("passed"));
  assert_eq!(s.get_exam(exam.exam_id).await.unwrap(), Some(exam.clone()));

  let patch = ExamPatch { score: Some(None), instructor_id: Some(None), ..Default::default() };
  let updated = s.update_exam(exam.exam_id, patch).await.unwrap();
  assert_eq!(updated.score, None);
  assert_eq!(updated.instructor_id, None);

  let ghost = ExamPatch { instructor_id: Some(Some(Uuid::new_v4())), ..Default::default() };
  let err = s.update_exam(exam.exam_id, ghost).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::Validation(e) if e.has("instructor_id")));

  let err = s.update_exam(Uuid::new_v4(), ExamPatch::default()).await.unwrap_err();
  assert!(matches!(domain(err), casework_core::Error::NotFound { kind: EntityKind::Exam, .. }));

  assert!(s.delete_exam(exam.exam_id).await.unwrap());
  assert!(!s.delete_exam(exam.exam_id).await.unwrap());
}

#[tokio::test]
async fn exams_block_student_and_examiner_deletes() {
  let (s, student, instructor) = school().await;
  let course = s.add_course(NewCourse::named("PPL(A)")).await.unwrap();
  let mut input = NewExam::new(student, course.course_id, date(2026, 5, 20));
  input.instructor_id = Some(instructor);
  let exam = s.add_exam(input).await.unwrap();

  for err in [
    s.delete_student(student).await.unwrap_err(),
    s.delete_instructor(instructor).await.unwrap_err(),
  ] {
    match domain(err) {
      casework_core::Error::InUse { dependents, .. } => assert_eq!(dependents, vec!["exams"]),
      other => panic!("expected in-use error, got {other:?}"),
    }
  }

  s.delete_exam(exam.exam_id).await.unwrap();
  assert!(s.delete_student(student).await.unwrap());
  assert!(s.delete_instructor(instructor).await.unwrap());
}

#[tokio::test]
async fn exam_listing_filters_and_orders_newest_first() {
  let (s, pavel, oleg) = school().await;
  let maria = s.add_student(NewStudent::named("Maria Gromova")).await.unwrap().student_id;
  let ppl = s.add_course(NewCourse::named("PPL(A)")).await.unwrap().course_id;
  let night = s.add_course(NewCourse::named("Night rating")).await.unwrap().course_id;

  let mut first = NewExam::new(pavel, ppl, date(2026, 3, 1));
  first.result = Some("failed".into());
  let first = s.add_exam(first).await.unwrap();
  let mut retake = NewExam::new(pavel, ppl, date(2026, 4, 1));
  retake.result = Some("passed".into());
  retake.instructor_id = Some(oleg);
  let retake = s.add_exam(retake).await.unwrap();
  let mut other = NewExam::new(maria, night, date(2026, 5, 1));
  other.result = Some("passed".into());
  let other = s.add_exam(other).await.unwrap();

  let all = s.list_exams(&ExamQuery::default()).await.unwrap();
  assert_eq!(all, vec![other.clone(), retake.clone(), first.clone()]);

  let pavel_only = s
    .list_exams(&ExamQuery { student_id: Some(pavel), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(pavel_only, vec![retake.clone(), first.clone()]);

  let passed = s
    .list_exams(&ExamQuery { result: Some("passed".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(passed, vec![other.clone(), retake.clone()]);

  let by_course = s
    .list_exams(&ExamQuery { text: Some("night".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_course, vec![other]);

  let by_examiner = s
    .list_exams(&ExamQuery { text: Some("vasin".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_examiner, vec![retake]);
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_groups_hits_by_collection() {
  let (s, m, o) = desk().await;
  s.add_migrant(migrant("Boris Kim")).await.unwrap();
  let permit = s
    .create_application(NewApplication::new(m, o, "work permit"))
    .await
    .unwrap();
  let visa = s
    .create_application(NewApplication::new(m, o, "student visa"))
    .await
    .unwrap();
  let approve = ApplicationPatch::status(ApplicationStatus::Approved);
  s.update_application(visa.application_id, approve, None).await.unwrap();

  let pavel = s.add_student(NewStudent::named("Pavel Orlov")).await.unwrap();
  let oleg = s.add_instructor(NewInstructor::named("Oleg Vasin")).await.unwrap();
  let mut lesson =
    NewLesson::new(pavel.student_id, oleg.instructor_id, date(2026, 3, 14), hours(1.0));
  lesson.topic = Some("circuits".into());
  let lesson = s.create_lesson(lesson).await.unwrap();
  let mut cessna = NewAircraft::tail("RA-1234G");
  cessna.model = Some("Cessna 172".into());
  s.add_aircraft(cessna).await.unwrap();

  let hits = s.search("petrova".into()).await.unwrap();
  assert_eq!(hits.migrants.len(), 1);
  assert_eq!(hits.applications.len(), 2);
  assert!(hits.students.is_empty());

  let approved = s.search("approved".into()).await.unwrap();
  assert_eq!(approved.applications.len(), 1);
  assert_eq!(approved.applications[0].application_id, visa.application_id);

  let permits = s.search("PERMIT".into()).await.unwrap();
  assert_eq!(permits.applications[0].application_id, permit.application_id);

  let orlov = s.search("orlov".into()).await.unwrap();
  assert_eq!(orlov.students, vec![pavel]);
  assert_eq!(orlov.lessons, vec![lesson.clone()]);

  let circuits = s.search("circuits".into()).await.unwrap();
  assert_eq!(circuits.lessons, vec![lesson]);

  let fleet = s.search("cessna".into()).await.unwrap();
  assert_eq!(fleet.aircraft.len(), 1);
  assert_eq!(s.search("vasin".into()).await.unwrap().instructors, vec![oleg]);

  let phone = s.search("555 01".into()).await.unwrap();
  assert_eq!(phone.migrants.len(), 2);
}

#[tokio::test]
async fn search_caps_each_group_and_ignores_blank_text() {
  let s = store().await;
  for i in 0..(SEARCH_LIMIT + 2) {
    s.add_migrant(migrant(&format!("Petrov {i}"))).await.unwrap();
    s.add_student(NewStudent::named(format!("Petrov {i}"))).await.unwrap();
  }

  let hits = s.search("petrov".into()).await.unwrap();
  assert_eq!(hits.migrants.len(), SEARCH_LIMIT);
  assert_eq!(hits.students.len(), SEARCH_LIMIT);
  assert_eq!(hits.migrants[0].full_name, "Petrov 0");

  let blank = s.search("   ".into()).await.unwrap();
  assert_eq!(blank, SearchResults::default());
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_store_keeps_data() {
  let dir = std::env::temp_dir().join(format!("casework-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("casework.db");

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.add_course(NewCourse::named("PPL(A)")).await.unwrap().course_id
  };
  let s = SqliteStore::open(&path).await.unwrap();
  assert!(s.get_course(id).await.unwrap().is_some());

  drop(s);
  let _ = std::fs::remove_dir_all(&dir);
}
