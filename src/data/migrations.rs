use std::collections::HashSet;

use rusqlite::Connection;

use crate::error::AppError;

/// `PRAGMA user_version` stamped by [`create_source_schema`].
pub const SOURCE_SCHEMA_VERSION: i64 = 6;

const SOURCE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS files (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    path              TEXT    NOT NULL UNIQUE,
    mtime             INTEGER NOT NULL,
    size              INTEGER NOT NULL DEFAULT 0,
    kind              TEXT    NOT NULL DEFAULT 'text',
    indexed_at        INTEGER,
    extract_ms        INTEGER,
    content_hash      TEXT,
    canonical_file_id INTEGER REFERENCES files(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS files_content_hash ON files(content_hash)
    WHERE content_hash IS NOT NULL;
CREATE INDEX IF NOT EXISTS files_canonical ON files(canonical_file_id)
    WHERE canonical_file_id IS NOT NULL;

CREATE TABLE IF NOT EXISTS lines (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id              INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    line_number          INTEGER NOT NULL,
    chunk_archive        TEXT,
    chunk_name           TEXT,
    line_offset_in_chunk INTEGER
);

CREATE INDEX IF NOT EXISTS lines_file_id ON lines(file_id);

CREATE VIRTUAL TABLE IF NOT EXISTS lines_fts USING fts5(
    content,
    content  = '',
    tokenize = 'trigram'
);

CREATE TABLE IF NOT EXISTS scan_history (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    scanned_at  INTEGER NOT NULL,
    total_files INTEGER NOT NULL,
    total_size  INTEGER NOT NULL,
    by_kind     TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS indexing_errors (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    path       TEXT    NOT NULL UNIQUE,
    error      TEXT    NOT NULL,
    first_seen INTEGER NOT NULL,
    last_seen  INTEGER NOT NULL,
    count      INTEGER NOT NULL DEFAULT 1
);
";

/// Columns that databases written by older servers may lack.
const FILES_COLUMNS: &[(&str, &str)] = &[
    ("indexed_at", "INTEGER"),
    ("extract_ms", "INTEGER"),
    ("content_hash", "TEXT"),
    ("canonical_file_id", "INTEGER"),
];

/// Creates the full source database layout on an empty connection.
pub fn create_source_schema(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    conn.execute_batch(SOURCE_SCHEMA)?;
    conn.pragma_update(None, "user_version", SOURCE_SCHEMA_VERSION)?;
    Ok(())
}

/// Brings an existing `files` table up to the columns the seeder writes.
pub fn ensure_schema(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    let columns = table_columns(conn, "files")?;
    if columns.is_empty() {
        return Err(AppError::General(
            "files table not found; is this a find-anything source database?".to_string(),
        ));
    }

    for (name, ty) in FILES_COLUMNS {
        if !columns.contains(*name) {
            tracing::info!(column = name, "adding missing files column");
            conn.execute_batch(&format!("ALTER TABLE files ADD COLUMN {name} {ty};"))?;
        }
    }
    Ok(())
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool, AppError> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM sqlite_master WHERE type='table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn table_columns(conn: &Connection, table: &str) -> Result<HashSet<String>, AppError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<HashSet<_>>>()?;
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    #[test]
    fn test_source_schema_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_source_schema(&conn).unwrap();

        let tables = tables(&conn);
        for name in ["files", "lines", "lines_fts", "scan_history", "indexing_errors"] {
            assert!(tables.contains(&name.to_string()), "missing {name}");
        }

        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SOURCE_SCHEMA_VERSION);
    }

    #[test]
    fn test_source_schema_enables_wal() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("projects.db")).unwrap();
        create_source_schema(&conn).unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }

    #[test]
    fn test_source_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_source_schema(&conn).unwrap();
        create_source_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
    }

    #[test]
    fn test_ensure_schema_adds_missing_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE files (
                 id    INTEGER PRIMARY KEY AUTOINCREMENT,
                 path  TEXT NOT NULL UNIQUE,
                 mtime INTEGER NOT NULL,
                 size  INTEGER NOT NULL DEFAULT 0,
                 kind  TEXT NOT NULL DEFAULT 'text'
             );",
        )
        .unwrap();

        ensure_schema(&conn).unwrap();
        let columns = table_columns(&conn, "files").unwrap();
        for (name, _) in FILES_COLUMNS {
            assert!(columns.contains(*name), "missing {name}");
        }

        // second pass finds nothing to add
        ensure_schema(&conn).unwrap();
    }

    #[test]
    fn test_ensure_schema_rejects_foreign_database() {
        let conn = Connection::open_in_memory().unwrap();
        let err = ensure_schema(&conn).unwrap_err();
        assert!(matches!(err, AppError::General(_)));
    }

    #[test]
    fn test_table_exists() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!table_exists(&conn, "scan_history").unwrap());
        create_source_schema(&conn).unwrap();
        assert!(table_exists(&conn, "scan_history").unwrap());
    }
}
