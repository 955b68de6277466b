//! SQL schema for the Casework SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- ── Migration desk ──────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS migrants (
    migrant_id      TEXT PRIMARY KEY,
    full_name       TEXT NOT NULL,
    passport_number TEXT NOT NULL,
    birth_date      TEXT,            -- ISO 8601 date
    address         TEXT,
    gender          TEXT NOT NULL,
    phone_number    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS officers (
    officer_id TEXT PRIMARY KEY,
    full_name  TEXT NOT NULL,
    position   TEXT,
    email      TEXT,
    login      TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS applications (
    application_id TEXT PRIMARY KEY,
    migrant_id     TEXT NOT NULL REFERENCES migrants(migrant_id) ON DELETE RESTRICT,
    officer_id     TEXT NOT NULL REFERENCES officers(officer_id) ON DELETE RESTRICT,
    kind           TEXT NOT NULL,
    status         TEXT NOT NULL,   -- ApplicationStatus wire spelling
    submitted_at   TEXT NOT NULL,   -- RFC 3339 UTC, microseconds
    decision_date  TEXT,
    version        INTEGER NOT NULL DEFAULT 1
);

-- Strictly append-only; rows leave only through the cascade.
CREATE TABLE IF NOT EXISTS application_status_changes (
    seq             INTEGER PRIMARY KEY AUTOINCREMENT,
    change_id       TEXT NOT NULL UNIQUE,
    entity_id       TEXT NOT NULL REFERENCES applications(application_id) ON DELETE CASCADE,
    previous_status TEXT,
    status          TEXT NOT NULL,
    changed_at      TEXT NOT NULL,
    comment         TEXT
);

-- ── Flight school ───────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS courses (
    course_id      TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    category       TEXT,
    description    TEXT,
    required_hours REAL,
    is_active      INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS students (
    student_id  TEXT PRIMARY KEY,
    full_name   TEXT NOT NULL,
    email       TEXT UNIQUE,
    phone       TEXT,
    birth_date  TEXT,
    enrolled_on TEXT,
    course_id   TEXT REFERENCES courses(course_id) ON DELETE RESTRICT
);

CREATE TABLE IF NOT EXISTS instructors (
    instructor_id TEXT PRIMARY KEY,
    full_name     TEXT NOT NULL,
    email         TEXT,
    phone         TEXT,
    rank          TEXT,
    hired_on      TEXT,
    is_active     INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS aircraft (
    aircraft_id TEXT PRIMARY KEY,
    tail_number TEXT NOT NULL UNIQUE,
    model       TEXT,
    kind        TEXT,
    year        INTEGER,
    total_hours REAL,
    status      TEXT
);

CREATE TABLE IF NOT EXISTS lessons (
    lesson_id      TEXT PRIMARY KEY,
    student_id     TEXT NOT NULL REFERENCES students(student_id) ON DELETE RESTRICT,
    instructor_id  TEXT NOT NULL REFERENCES instructors(instructor_id) ON DELETE RESTRICT,
    course_id      TEXT REFERENCES courses(course_id) ON DELETE RESTRICT,
    aircraft_id    TEXT REFERENCES aircraft(aircraft_id) ON DELETE RESTRICT,
    date           TEXT NOT NULL,
    duration_hours REAL NOT NULL,
    topic          TEXT,
    remarks        TEXT,
    status         TEXT NOT NULL DEFAULT 'Planned',
    version        INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS lesson_status_changes (
    seq             INTEGER PRIMARY KEY AUTOINCREMENT,
    change_id       TEXT NOT NULL UNIQUE,
    entity_id       TEXT NOT NULL REFERENCES lessons(lesson_id) ON DELETE CASCADE,
    previous_status TEXT,
    status          TEXT NOT NULL,
    changed_at      TEXT NOT NULL,
    comment         TEXT
);

CREATE TABLE IF NOT EXISTS certificates (
    certificate_id        TEXT PRIMARY KEY,
    title                 TEXT NOT NULL,
    description           TEXT,
    course_id             TEXT REFERENCES courses(course_id) ON DELETE RESTRICT,
    default_validity_days INTEGER
);

CREATE TABLE IF NOT EXISTS student_certificates (
    student_certificate_id TEXT PRIMARY KEY,
    student_id             TEXT NOT NULL REFERENCES students(student_id) ON DELETE RESTRICT,
    certificate_id         TEXT NOT NULL REFERENCES certificates(certificate_id) ON DELETE RESTRICT,
    issued_on              TEXT NOT NULL,
    number                 TEXT,
    valid_until            TEXT,
    status                 TEXT NOT NULL DEFAULT 'Active',
    notes                  TEXT
);

CREATE TABLE IF NOT EXISTS exams (
    exam_id       TEXT PRIMARY KEY,
    student_id    TEXT NOT NULL REFERENCES students(student_id) ON DELETE RESTRICT,
    course_id     TEXT NOT NULL REFERENCES courses(course_id) ON DELETE RESTRICT,
    instructor_id TEXT REFERENCES instructors(instructor_id) ON DELETE RESTRICT,
    date          TEXT NOT NULL,
    score         REAL,
    result        TEXT
);

CREATE INDEX IF NOT EXISTS applications_migrant_idx   ON applications(migrant_id);
CREATE INDEX IF NOT EXISTS applications_officer_idx   ON applications(officer_id);
CREATE INDEX IF NOT EXISTS applications_submitted_idx ON applications(submitted_at);
CREATE INDEX IF NOT EXISTS app_changes_entity_idx     ON application_status_changes(entity_id);
CREATE INDEX IF NOT EXISTS lessons_date_idx           ON lessons(date);
CREATE INDEX IF NOT EXISTS lessons_student_idx        ON lessons(student_id);
CREATE INDEX IF NOT EXISTS lessons_instructor_idx     ON lessons(instructor_id);
CREATE INDEX IF NOT EXISTS lesson_changes_entity_idx  ON lesson_status_changes(entity_id);
CREATE INDEX IF NOT EXISTS student_certs_student_idx  ON student_certificates(student_id);
CREATE INDEX IF NOT EXISTS exams_student_idx          ON exams(student_id);
CREATE INDEX IF NOT EXISTS exams_course_idx           ON exams(course_id);

PRAGMA user_version = 1;
";
