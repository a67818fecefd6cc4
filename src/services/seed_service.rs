use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use walkdir::WalkDir;

use crate::data::{migrations, repository};
use crate::error::AppError;
use crate::services::history_service::{self, DEFAULT_SCANS};
use crate::services::synth_service::{FileSynthesizer, DEFAULT_SEED};

pub const DEFAULT_COUNT: usize = 500;
pub const DEFAULT_SOURCE_DIR: &str = "sources";

#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub count: usize,
    pub clear: bool,
    pub n_scans: usize,
    pub seed: u64,
    /// Unix seconds treated as "now"; the history covers the year before it.
    pub now: i64,
}

impl SeedOptions {
    pub fn new(now: i64) -> Self {
        Self {
            count: DEFAULT_COUNT,
            clear: false,
            n_scans: DEFAULT_SCANS,
            seed: DEFAULT_SEED,
            now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub total_files: usize,
    pub history_points: usize,
    /// Per-kind counts of the records fabricated in this run.
    pub kinds: BTreeMap<String, usize>,
}

impl SeedReport {
    /// `kind=count` pairs in kind order, for the run summary.
    pub fn kinds_summary(&self) -> String {
        self.kinds
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// Resolves the source databases to seed under `<data_dir>/sources`.
///
/// With `source` the single `<source>.db` path is returned whether or not it
/// exists, so the caller can report or create it.
pub fn discover_databases(data_dir: &Path, source: Option<&str>) -> Result<Vec<PathBuf>, AppError> {
    let sources_dir = data_dir.join(DEFAULT_SOURCE_DIR);
    if !sources_dir.is_dir() {
        return Err(AppError::NotFound(format!(
            "No sources directory found at {}",
            sources_dir.display()
        )));
    }

    if let Some(name) = source {
        return Ok(vec![sources_dir.join(format!("{name}.db"))]);
    }

    let mut dbs: Vec<PathBuf> = WalkDir::new(&sources_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("db"))
        .collect();
    dbs.sort();

    if dbs.is_empty() {
        return Err(AppError::NotFound(format!(
            "No .db files found in {}",
            sources_dir.display()
        )));
    }
    Ok(dbs)
}

/// Creates `db_path` with the source layout. Existing databases are left alone.
pub fn init_database(db_path: &Path) -> Result<(), AppError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(db_path)?;
    migrations::create_source_schema(&conn)?;
    Ok(())
}

pub fn seed_database(db_path: &Path, options: &SeedOptions) -> Result<SeedReport, AppError> {
    tracing::info!("Seeding {} with {} files", db_path.display(), options.count);
    let conn = Connection::open(db_path)?;
    seed_connection(&conn, options)
}

/// Seeds every database `discover_databases` resolves, creating the named
/// source first when `init` is set. A resolved path that does not exist is
/// skipped and comes back with `None`.
pub fn seed_all(
    data_dir: &Path,
    source: Option<&str>,
    init: bool,
    options: &SeedOptions,
) -> Result<Vec<(PathBuf, Option<SeedReport>)>, AppError> {
    if let (true, Some(name)) = (init, source) {
        let db_path = data_dir
            .join(DEFAULT_SOURCE_DIR)
            .join(format!("{name}.db"));
        if !db_path.exists() {
            init_database(&db_path)?;
            tracing::info!("created {}", db_path.display());
        }
    }

    let mut results = Vec::new();
    for db_path in discover_databases(data_dir, source)? {
        if !db_path.exists() {
            tracing::warn!("skipping {} (not found)", db_path.display());
            results.push((db_path, None));
            continue;
        }
        let report = seed_database(&db_path, options)?;
        results.push((db_path, Some(report)));
    }
    Ok(results)
}

/// Fabricates records into `conn` and rebuilds `scan_history` from every row,
/// pre-existing ones included.
pub fn seed_connection(conn: &Connection, options: &SeedOptions) -> Result<SeedReport, AppError> {
    migrations::ensure_schema(conn)?;

    if options.clear {
        repository::clear_seeded_data(conn)?;
        tracing::info!("cleared existing data");
    }

    let mut used = repository::existing_paths(conn)?;
    let mut synth = FileSynthesizer::new(options.seed);
    let files = synth.synthesize(options.count, options.now, &mut used);

    let inserted = repository::insert_files(conn, &files)?;
    let total_files = repository::count_files(conn)?;
    tracing::info!("inserted {inserted} file records ({total_files} total)");

    let rows = repository::load_file_stats(conn, options.now)?;
    let history = history_service::make_scan_history(&rows, options.n_scans, options.now)?;
    let history_points = repository::replace_scan_history(conn, &history)?;
    tracing::info!("wrote {history_points} scan history points (past year)");

    let mut kinds = BTreeMap::new();
    for file in &files {
        *kinds.entry(file.kind.to_string()).or_insert(0) += 1;
    }

    let report = SeedReport {
        inserted,
        total_files,
        history_points,
        kinds,
    };
    tracing::info!("kinds: {}", report.kinds_summary());
    Ok(report)
}
