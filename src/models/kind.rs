use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Text,
    Image,
    Video,
    Audio,
    Pdf,
    Archive,
    Document,
    Binary,
    Executable,
    Unknown,
}

impl FileKind {
    pub const ALL: [FileKind; 10] = [
        Self::Text,
        Self::Image,
        Self::Video,
        Self::Audio,
        Self::Pdf,
        Self::Archive,
        Self::Document,
        Self::Binary,
        Self::Executable,
        Self::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Pdf => "pdf",
            Self::Archive => "archive",
            Self::Document => "document",
            Self::Binary => "binary",
            Self::Executable => "executable",
            Self::Unknown => "unknown",
        }
    }

    pub fn profile(self) -> &'static KindProfile {
        match self {
            Self::Text => &TEXT,
            Self::Image => &IMAGE,
            Self::Video => &VIDEO,
            Self::Audio => &AUDIO,
            Self::Pdf => &PDF,
            Self::Archive => &ARCHIVE,
            Self::Document => &DOCUMENT,
            Self::Binary => &BINARY,
            Self::Executable => &EXECUTABLE,
            Self::Unknown => &UNKNOWN,
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown file kind: {s}"))
    }
}

/// Distribution tables used when fabricating records of one kind.
#[derive(Debug)]
pub struct KindProfile {
    pub weight: u32,
    /// Inclusive `(min_bytes, max_bytes)`.
    pub size_range: (i64, i64),
    /// Inclusive `(min_ms, max_ms)`; `None` means the kind is never extracted.
    pub extract_ms: Option<(i64, i64)>,
    pub extensions: &'static [&'static str],
    pub dirs: &'static [&'static str],
    pub stems: &'static [&'static str],
}

static TEXT: KindProfile = KindProfile {
    weight: 35,
    size_range: (512, 500_000),
    extract_ms: Some((1, 120)),
    extensions: &[
        "rs", "py", "ts", "js", "go", "java", "md", "txt", "yaml", "toml", "json", "sh", "sql",
        "html", "css", "rb", "cpp", "c",
    ],
    dirs: &[
        "src", "src/api", "src/auth", "src/db", "src/models", "src/utils", "tests", "docs",
        "scripts", "config", "lib", "internal",
    ],
    stems: &[
        "main", "lib", "index", "utils", "config", "auth", "api", "db", "server", "client",
        "routes", "handler", "middleware", "schema", "migration", "model", "service",
        "controller", "test", "spec", "README", "CHANGELOG", "ARCHITECTURE", "Makefile",
        "Dockerfile", "deploy", "setup", "init", "parser", "lexer", "encoder", "decoder", "cache",
        "queue", "worker", "scheduler", "notifier", "webhook", "session", "token", "crypto",
    ],
};

static IMAGE: KindProfile = KindProfile {
    weight: 25,
    size_range: (80_000, 25_000_000),
    extract_ms: Some((5, 300)),
    extensions: &["jpg", "jpeg", "png", "heic", "tiff", "raw", "cr2", "webp"],
    dirs: &[
        "assets/images", "assets/icons", "public/img", "photos", "screenshots", "media",
        "resources",
    ],
    stems: &[
        "screenshot", "banner", "logo", "icon", "thumbnail", "avatar", "background", "hero",
        "diagram", "chart", "photo", "cover", "preview", "mockup", "wireframe", "IMG_0042",
        "IMG_1337", "DSC_0012", "DSC_2048", "DCIM_0099",
    ],
};

static VIDEO: KindProfile = KindProfile {
    weight: 12,
    size_range: (5_000_000, 4_000_000_000),
    extract_ms: None,
    extensions: &["mp4", "mkv", "mov", "avi", "m4v", "webm"],
    dirs: &["recordings", "media/video", "assets/video", "tutorials"],
    stems: &[
        "demo", "tutorial", "recording", "walkthrough", "presentation", "screen-capture",
        "review", "overview", "intro", "teaser",
    ],
};

static AUDIO: KindProfile = KindProfile {
    weight: 8,
    size_range: (2_000_000, 80_000_000),
    extract_ms: Some((5, 80)),
    extensions: &["mp3", "flac", "m4a", "ogg", "wav", "opus"],
    dirs: &["media/audio", "music", "podcasts", "recordings", "assets/sounds"],
    stems: &[
        "podcast-ep01", "podcast-ep02", "meeting-recording", "voiceover", "soundtrack",
        "ambient", "notification", "alert",
    ],
};

static PDF: KindProfile = KindProfile {
    weight: 6,
    size_range: (50_000, 30_000_000),
    extract_ms: Some((80, 8_000)),
    extensions: &["pdf"],
    dirs: &["docs", "reports", "contracts", "invoices", "manuals", "research"],
    stems: &[
        "report", "invoice", "contract", "spec", "manual", "proposal", "architecture",
        "requirements", "runbook", "sla", "terms", "Q1-report", "Q2-report", "Q3-report",
        "Q4-report",
    ],
};

static ARCHIVE: KindProfile = KindProfile {
    weight: 4,
    size_range: (10_000, 500_000_000),
    extract_ms: Some((20, 1_500)),
    extensions: &["zip", "tar.gz", "7z", "tgz", "tar.bz2"],
    dirs: &["releases", "backups", "dist", "artifacts", "vendor"],
    stems: &[
        "backup", "release-v1.0", "release-v1.1", "dist", "vendor", "assets", "exports",
        "archive-2023", "archive-2024",
    ],
};

static DOCUMENT: KindProfile = KindProfile {
    weight: 4,
    size_range: (20_000, 5_000_000),
    extract_ms: Some((30, 3_000)),
    extensions: &["docx", "xlsx", "pptx", "epub"],
    dirs: &["docs", "reports", "presentations", "specs", "proposals"],
    stems: &[
        "spec", "proposal", "roadmap", "presentation", "report", "onboarding", "handbook",
        "playbook", "meeting-notes",
    ],
};

static BINARY: KindProfile = KindProfile {
    weight: 4,
    size_range: (4_000, 200_000_000),
    extract_ms: None,
    extensions: &["bin", "db", "sqlite", "wasm", "so", "dylib", "ttf"],
    dirs: &["lib", "vendor", "bin", "data", "cache", "build"],
    stems: &[
        "libc", "libssl", "libcrypto", "database", "cache", "data", "model", "weights", "index",
    ],
};

static EXECUTABLE: KindProfile = KindProfile {
    weight: 1,
    size_range: (50_000, 250_000_000),
    extract_ms: None,
    extensions: &["exe", "dll", "deb", "rpm"],
    dirs: &["bin", "dist", "build/release"],
    stems: &["server", "worker", "migrate", "setup", "installer"],
};

static UNKNOWN: KindProfile = KindProfile {
    weight: 1,
    size_range: (100, 1_000_000),
    extract_ms: None,
    extensions: &["dat", "bak", "tmp", "cache"],
    dirs: &["data", "tmp", "cache", "misc"],
    stems: &["data", "output", "dump", "export", "import", "cache"],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_from_str() {
        for kind in FileKind::ALL {
            assert_eq!(kind.as_str().parse::<FileKind>().unwrap(), kind);
        }
        assert!("spreadsheet".parse::<FileKind>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_tag() {
        let json = serde_json::to_string(&FileKind::Executable).unwrap();
        assert_eq!(json, "\"executable\"");
    }

    #[test]
    fn profiles_are_well_formed() {
        for kind in FileKind::ALL {
            let p = kind.profile();
            assert!(p.weight > 0, "{kind} has zero weight");
            assert!(p.size_range.0 > 0 && p.size_range.0 < p.size_range.1);
            if let Some((lo, hi)) = p.extract_ms {
                assert!(lo >= 1 && lo < hi, "{kind} extract range");
            }
            assert!(!p.extensions.is_empty());
            assert!(!p.dirs.is_empty());
            assert!(!p.stems.is_empty());
        }
    }

    #[test]
    fn weights_sum_to_one_hundred() {
        let total: u32 = FileKind::ALL.iter().map(|k| k.profile().weight).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn never_extracted_kinds() {
        let none: Vec<_> = FileKind::ALL
            .iter()
            .filter(|k| k.profile().extract_ms.is_none())
            .map(|k| k.as_str())
            .collect();
        assert_eq!(none, vec!["video", "binary", "executable", "unknown"]);
    }
}
