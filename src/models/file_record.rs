use serde::{Deserialize, Serialize};

use crate::models::kind::FileKind;

/// A fabricated `files` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticFile {
    pub path: String,
    pub mtime: i64,
    pub size: i64,
    pub kind: FileKind,
    pub indexed_at: i64,
    pub extract_ms: Option<i64>,
}

/// The columns of a `files` row that feed the scan-history aggregates.
///
/// `kind` stays a plain string because rows read back from a real database may
/// carry tags this crate does not fabricate.
#[derive(Debug, Clone, PartialEq)]
pub struct FileStatRow {
    pub kind: String,
    pub size: i64,
    pub extract_ms: Option<i64>,
    pub indexed_at: i64,
}

impl From<&SyntheticFile> for FileStatRow {
    fn from(file: &SyntheticFile) -> Self {
        Self {
            kind: file.kind.to_string(),
            size: file.size,
            extract_ms: file.extract_ms,
            indexed_at: file.indexed_at,
        }
    }
}
