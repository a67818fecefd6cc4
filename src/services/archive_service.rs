use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::AppError;

/// 2024-01-01T00:00:00Z, stamped on every tar member.
pub const TAR_MTIME: u64 = 1_704_067_200;

macro_rules! archive_member {
    ($archive:literal, $name:literal) => {
        (
            $name,
            include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/assets/archives/",
                $archive,
                "/",
                $name
            )),
        )
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

#[derive(Debug)]
pub struct DemoArchive {
    pub path: &'static str,
    pub format: ArchiveFormat,
    pub members: &'static [(&'static str, &'static str)],
}

pub static DEMO_ARCHIVES: &[DemoArchive] = &[
    // release docs a user might download next to the binary
    DemoArchive {
        path: "projects/taskflow/releases/taskflow-v0.4.2-docs.zip",
        format: ArchiveFormat::Zip,
        members: &[
            archive_member!("taskflow-v0.4.2-docs", "taskflow-v0.4.2/README.md"),
            archive_member!("taskflow-v0.4.2-docs", "taskflow-v0.4.2/CHANGELOG.md"),
            archive_member!("taskflow-v0.4.2-docs", "taskflow-v0.4.2/docs/api-reference.md"),
            archive_member!(
                "taskflow-v0.4.2-docs",
                "taskflow-v0.4.2/config/production.toml.example"
            ),
        ],
    },
    // backup of older meeting notes
    DemoArchive {
        path: "notes/archive/2023-notes-backup.tar.gz",
        format: ArchiveFormat::TarGz,
        members: &[
            archive_member!("2023-notes-backup", "2023-notes/q4-planning.md"),
            archive_member!("2023-notes-backup", "2023-notes/q3-retrospective.md"),
            archive_member!("2023-notes-backup", "2023-notes/security-checklist.md"),
        ],
    },
];

pub fn write_zip(path: &Path, members: &[(&str, &str)]) -> Result<(), AppError> {
    let mut zip = ZipWriter::new(File::create(path)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in members {
        zip.start_file(*name, options)?;
        zip.write_all(content.as_bytes())?;
    }
    zip.finish()?;
    Ok(())
}

pub fn write_tar_gz(path: &Path, members: &[(&str, &str)]) -> Result<(), AppError> {
    let gz = GzEncoder::new(File::create(path)?, Compression::default());
    let mut builder = tar::Builder::new(gz);
    for (name, content) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mtime(TAR_MTIME);
        header.set_mode(0o644);
        builder.append_data(&mut header, name, content.as_bytes())?;
    }
    builder.into_inner()?.finish()?;
    Ok(())
}

/// Writes every demo archive under `root`, returning how many were written.
pub fn write_demo_archives(root: &Path) -> Result<usize, AppError> {
    for archive in DEMO_ARCHIVES {
        let path = root.join(archive.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        match archive.format {
            ArchiveFormat::Zip => write_zip(&path, archive.members)?,
            ArchiveFormat::TarGz => write_tar_gz(&path, archive.members)?,
        }
        let size = fs::metadata(&path)?.len();
        tracing::info!(
            "wrote {}  ({}KB, {} members)",
            archive.path,
            size / 1024,
            archive.members.len()
        );
    }
    Ok(DEMO_ARCHIVES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn zip_round_trips_members() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.zip");
        let members = [("a/README.md", "# hello\n"), ("a/b/notes.txt", "line one\nline two\n")];
        write_zip(&path, &members).unwrap();

        let mut zip = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(zip.len(), 2);
        let mut entry = zip.by_name("a/b/notes.txt").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        assert_eq!(text, "line one\nline two\n");
    }

    #[test]
    fn tar_gz_members_carry_fixed_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.tar.gz");
        write_tar_gz(&path, &[("notes/one.md", "one"), ("notes/two.md", "two!")]).unwrap();

        let gz = flate2::read::GzDecoder::new(File::open(&path).unwrap());
        let mut archive = tar::Archive::new(gz);
        let mut seen = Vec::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let header = entry.header();
            assert_eq!(header.mtime().unwrap(), TAR_MTIME);
            assert_eq!(header.mode().unwrap(), 0o644);
            let name = entry.path().unwrap().to_string_lossy().into_owned();
            let mut body = String::new();
            entry.read_to_string(&mut body).unwrap();
            seen.push((name, body));
        }
        assert_eq!(
            seen,
            vec![
                ("notes/one.md".to_string(), "one".to_string()),
                ("notes/two.md".to_string(), "two!".to_string())
            ]
        );
    }

    #[test]
    fn demo_archives_are_written() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(write_demo_archives(dir.path()).unwrap(), 2);

        let zip_path = dir.path().join(DEMO_ARCHIVES[0].path);
        let zip = zip::ZipArchive::new(File::open(zip_path).unwrap()).unwrap();
        assert_eq!(zip.len(), 4);

        let tar_path = dir.path().join(DEMO_ARCHIVES[1].path);
        let gz = flate2::read::GzDecoder::new(File::open(tar_path).unwrap());
        let count = tar::Archive::new(gz).entries().unwrap().count();
        assert_eq!(count, 3);
    }

    #[test]
    fn embedded_members_are_not_empty() {
        for archive in DEMO_ARCHIVES {
            for (name, content) in archive.members {
                assert!(!content.trim().is_empty(), "{name} is empty");
            }
        }
    }
}
