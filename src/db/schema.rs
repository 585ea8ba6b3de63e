//! Database schema migrations for openlms.
//!
//! Each entry is a full migration applied in order; the current version is
//! tracked in the `schema_version` table.

/// Ordered list of schema migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: accounts
    "CREATE TABLE accounts (
        id                  INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name           TEXT NOT NULL,
        email               TEXT NOT NULL UNIQUE COLLATE NOCASE,
        password_hash       TEXT NOT NULL,
        role                TEXT NOT NULL DEFAULT 'user',
        reset_token_hash    TEXT,
        reset_token_expiry  TEXT,
        created_at          TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at          TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX idx_accounts_reset_hash ON accounts(reset_token_hash);
    CREATE INDEX idx_accounts_role ON accounts(role);",
    // v2: courses and embedded lectures
    "CREATE TABLE courses (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        title       TEXT NOT NULL,
        description TEXT NOT NULL,
        category    TEXT NOT NULL,
        created_by  INTEGER NOT NULL REFERENCES accounts(id),
        created_at  TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE TABLE lectures (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        course_id   INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        title       TEXT NOT NULL,
        description TEXT NOT NULL,
        position    INTEGER NOT NULL DEFAULT 0
    );
    CREATE INDEX idx_lectures_course ON lectures(course_id);",
];
