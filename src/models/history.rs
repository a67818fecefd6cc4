use serde::{Deserialize, Serialize};

/// Per-kind aggregate as stored in `scan_history.by_kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindStats {
    pub count: usize,
    pub size: i64,
    pub avg_extract_ms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanHistoryPoint {
    pub scanned_at: i64,
    pub total_files: usize,
    pub total_size: i64,
    /// JSON object mapping kind tag to [`KindStats`].
    pub by_kind: String,
}
