//! SQL schema for the Ideabox SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- `seq` is the insertion order and breaks `created_at` ties when scanning.
CREATE TABLE IF NOT EXISTS suggestions (
    seq          INTEGER PRIMARY KEY AUTOINCREMENT,
    id           TEXT NOT NULL UNIQUE,
    created_at   TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    title        TEXT NOT NULL,
    description  TEXT NOT NULL,
    status       TEXT NOT NULL DEFAULT 'pending'
                 CHECK (status IN ('pending', 'reviewed', 'implemented', 'rejected')),
    author_name  TEXT,
    author_email TEXT
);

-- Only `status` is ever updated. No DELETE is ever issued.
CREATE TRIGGER IF NOT EXISTS suggestions_immutable_fields
BEFORE UPDATE OF seq, id, created_at, title, description, author_name, author_email
ON suggestions
BEGIN
    SELECT RAISE(ABORT, 'only status may be updated');
END;

CREATE INDEX IF NOT EXISTS suggestions_status_idx ON suggestions(status, seq);

PRAGMA user_version = 1;
";
