use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::services::{archive_service, image_service};

pub const DEFAULT_ROOT: &str = "/tmp/find-demo";

macro_rules! demo_file {
    ($path:literal) => {
        (
            $path,
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/demo/", $path)),
        )
    };
}

/// Source, config, and prose files for the two fictional projects and the notes folder.
pub static TEXT_FILES: &[(&str, &str)] = &[
    demo_file!("projects/taskflow/README.md"),
    demo_file!("projects/taskflow/Cargo.toml"),
    demo_file!("projects/taskflow/config/default.toml"),
    demo_file!("projects/taskflow/src/main.rs"),
    demo_file!("projects/taskflow/src/auth.rs"),
    demo_file!("projects/taskflow/src/tasks.rs"),
    demo_file!("projects/taskflow/src/api/routes.rs"),
    demo_file!("projects/taskflow/src/api/middleware.rs"),
    demo_file!("projects/taskflow/docs/architecture.md"),
    demo_file!("projects/taskflow/docs/deployment.md"),
    demo_file!("projects/weather-cli/README.md"),
    demo_file!("projects/weather-cli/pyproject.toml"),
    demo_file!("projects/weather-cli/src/main.py"),
    demo_file!("projects/weather-cli/src/api.py"),
    demo_file!("notes/meeting-notes.md"),
    demo_file!("notes/research-databases.md"),
    demo_file!("notes/ideas.md"),
    demo_file!("notes/onboarding-checklist.md"),
];

pub static JSON_FILES: &[(&str, &str)] = &[
    demo_file!("projects/taskflow/tests/fixtures/create_task.json"),
    demo_file!("projects/taskflow/tests/fixtures/task_response.json"),
    demo_file!("projects/taskflow/tests/fixtures/auth_token_response.json"),
    demo_file!("projects/taskflow/tests/fixtures/rate_limit_error.json"),
    demo_file!("projects/weather-cli/tests/fixtures/forecast_london.json"),
    demo_file!("notes/contacts.json"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub text: usize,
    pub json: usize,
    pub images: usize,
    pub archives: usize,
}

impl GenerateReport {
    pub fn total(&self) -> usize {
        self.text + self.json + self.images + self.archives
    }
}

/// The find-client `[[sources]]` entries that index the generated tree.
pub fn client_config(root: &Path) -> String {
    let root = root.display();
    format!(
        "[[sources]]\nname  = \"projects\"\npaths = [\"{root}/projects\"]\n\n\
         [[sources]]\nname  = \"notes\"\npaths = [\"{root}/notes\"]\n"
    )
}

pub fn write_files(root: &Path, files: &[(&str, &str)]) -> Result<usize, AppError> {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        tracing::info!("wrote {rel}");
    }
    Ok(files.len())
}

/// Recreates `root` from scratch and fills it with the whole demo tree.
pub fn generate(root: &Path) -> Result<GenerateReport, AppError> {
    if root.exists() {
        tracing::info!("removing previous demo tree at {}", root.display());
        fs::remove_dir_all(root)?;
    }
    fs::create_dir_all(root)?;

    let report = GenerateReport {
        text: write_files(root, TEXT_FILES)?,
        json: write_files(root, JSON_FILES)?,
        images: image_service::write_demo_images(root)?,
        archives: archive_service::write_demo_archives(root)?,
    };
    Ok(report)
}
