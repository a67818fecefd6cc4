use std::collections::HashSet;

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::models::file_record::SyntheticFile;
use crate::models::kind::FileKind;
use crate::services::history_service::ONE_YEAR_SECS;

pub const DEFAULT_SEED: u64 = 42;

const PATH_ATTEMPTS: usize = 100;
const FALLBACK_ATTEMPTS: usize = 10_000;
const SUFFIX_PROBABILITY: f64 = 0.4;
const MAX_MTIME_LAG_SECS: i64 = 30 * 86_400;
/// Alpha of the Beta(alpha, 1) distribution used for `indexed_at`.
const INDEXED_AT_ALPHA: f64 = 1.5;

/// Deterministic source of fabricated `files` rows.
pub struct FileSynthesizer {
    rng: StdRng,
    kind_index: WeightedIndex<u32>,
}

impl FileSynthesizer {
    pub fn new(seed: u64) -> Self {
        let weights = FileKind::ALL.iter().map(|k| k.profile().weight);
        let kind_index = match WeightedIndex::new(weights) {
            Ok(index) => index,
            Err(e) => unreachable!("kind weights are static and positive: {e}"),
        };
        Self {
            rng: StdRng::seed_from_u64(seed),
            kind_index,
        }
    }

    pub fn pick_kind(&mut self) -> FileKind {
        FileKind::ALL[self.kind_index.sample(&mut self.rng)]
    }

    pub fn pick_size(&mut self, kind: FileKind) -> i64 {
        let (lo, hi) = kind.profile().size_range;
        self.log_uniform(lo, hi)
    }

    pub fn pick_extract_ms(&mut self, kind: FileKind) -> Option<i64> {
        let (lo, hi) = kind.profile().extract_ms?;
        Some(self.log_uniform(lo.max(1), hi.max(1)))
    }

    /// Picks a `<dir>/<stem>.<ext>` path not already in `used`, and records it.
    ///
    /// Once the kind's path space is exhausted the last draw is returned even
    /// though it is taken; `INSERT OR IGNORE` drops such rows.
    pub fn pick_path(&mut self, kind: FileKind, used: &mut HashSet<String>) -> String {
        let profile = kind.profile();
        for _ in 0..PATH_ATTEMPTS {
            let dir = self.choose(profile.dirs);
            let mut stem = self.choose(profile.stems).to_string();
            let ext = self.choose(profile.extensions);
            if self.rng.gen_bool(SUFFIX_PROBABILITY) {
                stem = format!("{stem}-{:02}", self.rng.gen_range(1..=99));
            }
            let path = format!("{dir}/{stem}.{ext}");
            if used.insert(path.clone()) {
                return path;
            }
        }

        let mut path = String::new();
        for _ in 0..FALLBACK_ATTEMPTS {
            let dir = self.choose(profile.dirs);
            let stem = self.choose(profile.stems);
            let ext = self.choose(profile.extensions);
            path = format!("{dir}/{stem}-{}.{ext}", self.rng.gen_range(1000..=9999));
            if used.insert(path.clone()) {
                return path;
            }
        }
        tracing::debug!("no unused {kind} path left, reusing {path}");
        path
    }

    /// Fabricates `count` records indexed over the year ending at `now`.
    pub fn synthesize(
        &mut self,
        count: usize,
        now: i64,
        used: &mut HashSet<String>,
    ) -> Vec<SyntheticFile> {
        let one_year_ago = now - ONE_YEAR_SECS;
        let mut files = Vec::with_capacity(count);
        for _ in 0..count {
            let kind = self.pick_kind();
            let path = self.pick_path(kind, used);
            let size = self.pick_size(kind);
            let extract_ms = self.pick_extract_ms(kind);
            let age_fraction = self.recent_skewed_fraction();
            let indexed_at = one_year_ago + (age_fraction * (now - one_year_ago) as f64) as i64;
            let mtime = indexed_at - self.rng.gen_range(0..=MAX_MTIME_LAG_SECS);
            files.push(SyntheticFile {
                path,
                mtime,
                size,
                kind,
                indexed_at,
                extract_ms,
            });
        }
        files
    }

    fn choose(&mut self, items: &'static [&'static str]) -> &'static str {
        items[self.rng.gen_range(0..items.len())]
    }

    /// Log-uniform integer in `[lo, hi]`, so magnitudes spread evenly instead of
    /// bunching near the mean.
    fn log_uniform(&mut self, lo: i64, hi: i64) -> i64 {
        let (ln_lo, ln_hi) = ((lo as f64).ln(), (hi as f64).ln());
        let value = self.rng.gen_range(ln_lo..ln_hi).exp() as i64;
        value.clamp(lo, hi)
    }

    /// Beta(alpha, 1) sample via inverse CDF: `F(x) = x^alpha`.
    fn recent_skewed_fraction(&mut self) -> f64 {
        let u: f64 = self.rng.gen();
        u.powf(1.0 / INDEXED_AT_ALPHA)
    }
}

impl Default for FileSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_735_689_600;

    #[test]
    fn sizes_stay_within_kind_range() {
        let mut synth = FileSynthesizer::new(7);
        for kind in FileKind::ALL {
            let (lo, hi) = kind.profile().size_range;
            for _ in 0..500 {
                let size = synth.pick_size(kind);
                assert!(lo <= size && size <= hi, "{kind}: {size} outside {lo}..={hi}");
            }
        }
    }

    #[test]
    fn extract_ms_respects_profile() {
        let mut synth = FileSynthesizer::new(7);
        for kind in FileKind::ALL {
            for _ in 0..200 {
                match (kind.profile().extract_ms, synth.pick_extract_ms(kind)) {
                    (None, got) => assert_eq!(got, None),
                    (Some((lo, hi)), Some(ms)) => assert!(lo <= ms && ms <= hi),
                    (Some(_), None) => panic!("{kind} should always be extracted"),
                }
            }
        }
    }

    #[test]
    fn same_seed_same_records() {
        let a = FileSynthesizer::new(42).synthesize(200, NOW, &mut HashSet::new());
        let b = FileSynthesizer::new(42).synthesize(200, NOW, &mut HashSet::new());
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_records() {
        let a = FileSynthesizer::new(1).synthesize(50, NOW, &mut HashSet::new());
        let b = FileSynthesizer::new(2).synthesize(50, NOW, &mut HashSet::new());
        assert_ne!(a, b);
    }

    #[test]
    fn paths_are_unique_and_avoid_existing() {
        let mut used: HashSet<String> = ["src/main.rs".to_string()].into_iter().collect();
        let files = FileSynthesizer::default().synthesize(1_000, NOW, &mut used);
        let paths: HashSet<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths.len(), files.len());
        assert!(!paths.contains("src/main.rs"));
        assert_eq!(used.len(), files.len() + 1);
    }

    #[test]
    fn paths_fall_back_when_tables_are_exhausted() {
        // executable has 3 dirs x 5 stems x 4 exts = 60 plain paths, plus suffixed ones;
        // enough draws still all land somewhere unique.
        let mut synth = FileSynthesizer::new(3);
        let mut used = HashSet::new();
        for _ in 0..2_000 {
            synth.pick_path(FileKind::Executable, &mut used);
        }
        assert_eq!(used.len(), 2_000);
    }

    #[test]
    fn exhausted_path_space_returns_instead_of_spinning() {
        let profile = FileKind::Unknown.profile();
        let mut used = HashSet::new();
        for dir in profile.dirs {
            for stem in profile.stems {
                for ext in profile.extensions {
                    used.insert(format!("{dir}/{stem}.{ext}"));
                    for n in 1..=99 {
                        used.insert(format!("{dir}/{stem}-{n:02}.{ext}"));
                    }
                    for n in 1000..=9999 {
                        used.insert(format!("{dir}/{stem}-{n}.{ext}"));
                    }
                }
            }
        }
        let before = used.len();

        let path = FileSynthesizer::new(5).pick_path(FileKind::Unknown, &mut used);
        assert!(used.contains(&path));
        assert_eq!(used.len(), before);
    }

    #[test]
    fn timestamps_fall_within_the_year() {
        let files = FileSynthesizer::default().synthesize(500, NOW, &mut HashSet::new());
        for f in &files {
            assert!(f.indexed_at >= NOW - ONE_YEAR_SECS && f.indexed_at <= NOW);
            assert!(f.mtime <= f.indexed_at);
            assert!(f.indexed_at - f.mtime <= MAX_MTIME_LAG_SECS);
        }
    }

    #[test]
    fn indexing_skews_recent() {
        let files = FileSynthesizer::default().synthesize(2_000, NOW, &mut HashSet::new());
        let midpoint = NOW - ONE_YEAR_SECS / 2;
        let recent = files.iter().filter(|f| f.indexed_at > midpoint).count();
        // P(x > 0.5) = 1 - 0.5^1.5 ~ 0.65
        assert!(recent > files.len() / 2, "only {recent} of {} recent", files.len());
    }

    #[test]
    fn text_is_the_most_common_kind() {
        let mut synth = FileSynthesizer::default();
        let mut text = 0;
        let mut video = 0;
        for _ in 0..2_000 {
            match synth.pick_kind() {
                FileKind::Text => text += 1,
                FileKind::Video => video += 1,
                _ => {}
            }
        }
        assert!(text > video);
    }
}
