use std::collections::HashSet;

use rusqlite::{params, Connection};

use crate::data::migrations::table_exists;
use crate::error::AppError;
use crate::models::file_record::{FileStatRow, SyntheticFile};
use crate::models::history::ScanHistoryPoint;

pub fn existing_paths(conn: &Connection) -> Result<HashSet<String>, AppError> {
    let mut stmt = conn.prepare("SELECT path FROM files")?;
    let paths = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<HashSet<String>>>()?;
    Ok(paths)
}

pub fn count_files(conn: &Connection) -> Result<usize, AppError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))?;
    Ok(count as usize)
}

/// Inserts the records in one transaction, skipping paths that already exist.
/// Returns the number of rows actually written.
pub fn insert_files(conn: &Connection, files: &[SyntheticFile]) -> Result<usize, AppError> {
    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare_cached(
            "INSERT OR IGNORE INTO files (path, mtime, size, kind, indexed_at, extract_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for file in files {
            inserted += stmt.execute(params![
                file.path,
                file.mtime,
                file.size,
                file.kind.as_str(),
                file.indexed_at,
                file.extract_ms,
            ])?;
        }
    }
    tx.commit()?;
    Ok(inserted)
}

/// Reads every row's aggregate columns. Rows never stamped with `indexed_at`
/// count as indexed at `now`.
pub fn load_file_stats(conn: &Connection, now: i64) -> Result<Vec<FileStatRow>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT kind, COALESCE(size, 0), extract_ms, indexed_at FROM files",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(FileStatRow {
                kind: row.get(0)?,
                size: row.get(1)?,
                extract_ms: row.get(2)?,
                indexed_at: row.get::<_, Option<i64>>(3)?.unwrap_or(now),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Swaps the whole `scan_history` table for `points`.
pub fn replace_scan_history(
    conn: &Connection,
    points: &[ScanHistoryPoint],
) -> Result<usize, AppError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM scan_history", [])?;
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO scan_history (scanned_at, total_files, total_size, by_kind)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for point in points {
            stmt.execute(params![
                point.scanned_at,
                point.total_files as i64,
                point.total_size,
                point.by_kind,
            ])?;
        }
    }
    tx.commit()?;
    Ok(points.len())
}

/// Removes file rows and everything derived from them.
pub fn clear_seeded_data(conn: &Connection) -> Result<(), AppError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM scan_history", [])?;
    if table_exists(&tx, "lines_fts")? {
        // contentless FTS5 tables only support the bulk delete command
        tx.execute("INSERT INTO lines_fts(lines_fts) VALUES('delete-all')", [])?;
    }
    if table_exists(&tx, "lines")? {
        tx.execute("DELETE FROM lines", [])?;
    }
    tx.execute("DELETE FROM files", [])?;
    tx.commit()?;
    Ok(())
}
