use std::collections::BTreeMap;

use crate::error::AppError;
use crate::models::file_record::FileStatRow;
use crate::models::history::{KindStats, ScanHistoryPoint};

pub const ONE_YEAR_SECS: i64 = 365 * 86_400;
pub const DEFAULT_SCANS: usize = 24;

#[derive(Default)]
struct KindAccumulator {
    count: usize,
    size: i64,
    ms_sum: i64,
    ms_count: usize,
}

/// Groups rows by kind, summing count and size and averaging extraction time
/// over the rows that have one.
pub fn build_by_kind<'a, I>(rows: I) -> BTreeMap<String, KindStats>
where
    I: IntoIterator<Item = &'a FileStatRow>,
{
    let mut acc: BTreeMap<&str, KindAccumulator> = BTreeMap::new();
    for row in rows {
        let entry = acc.entry(row.kind.as_str()).or_default();
        entry.count += 1;
        entry.size += row.size;
        if let Some(ms) = row.extract_ms {
            entry.ms_sum += ms;
            entry.ms_count += 1;
        }
    }

    acc.into_iter()
        .map(|(kind, a)| {
            let avg_extract_ms = (a.ms_count > 0).then(|| a.ms_sum as f64 / a.ms_count as f64);
            (
                kind.to_string(),
                KindStats {
                    count: a.count,
                    size: a.size,
                    avg_extract_ms,
                },
            )
        })
        .collect()
}

pub fn build_by_kind_json<'a, I>(rows: I) -> Result<String, AppError>
where
    I: IntoIterator<Item = &'a FileStatRow>,
{
    Ok(serde_json::to_string(&build_by_kind(rows))?)
}

/// Evenly spaced timestamps from one year before `now` up to `now`, inclusive.
pub fn scan_times(n_scans: usize, now: i64) -> Vec<i64> {
    match n_scans {
        0 => Vec::new(),
        1 => vec![now],
        n => {
            let start = now - ONE_YEAR_SECS;
            let span = now - start;
            let steps = (n - 1) as i64;
            (0..n as i64).map(|i| start + i * span / steps).collect()
        }
    }
}

/// Builds one history point per scan time, each seeing only the rows indexed at
/// or before it. Scan times with nothing visible are dropped.
pub fn make_scan_history(
    rows: &[FileStatRow],
    n_scans: usize,
    now: i64,
) -> Result<Vec<ScanHistoryPoint>, AppError> {
    let mut points = Vec::new();
    for ts in scan_times(n_scans, now) {
        let visible: Vec<&FileStatRow> = rows.iter().filter(|r| r.indexed_at <= ts).collect();
        if visible.is_empty() {
            continue;
        }
        let total_size: i64 = visible.iter().map(|r| r.size).sum();
        points.push(ScanHistoryPoint {
            scanned_at: ts,
            total_files: visible.len(),
            total_size,
            by_kind: build_by_kind_json(visible.iter().copied())?,
        });
    }
    tracing::debug!(points = points.len(), rows = rows.len(), "built scan history");
    Ok(points)
}
