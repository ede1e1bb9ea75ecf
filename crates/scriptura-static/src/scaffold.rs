//! Scaffolding of a new report directory.

use std::fs;
use std::path::{Path, PathBuf};

use scriptura_report::{ThemeRole, CONFIG_FILE, SECTIONS_DIR};

use crate::templates::{
    starter_stylesheet, ScaffoldContext, TemplateEngine, GITIGNORE, SAMPLE_SECTIONS,
};

/// Errors that can occur while scaffolding.
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    #[error("'{0}' already exists. Use --force to overwrite it.")]
    AlreadyExists(String),

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(String),
}

/// Options for [`scaffold_report`].
#[derive(Debug, Clone, Default)]
pub struct ScaffoldOptions {
    /// Remove an existing target directory first
    pub force: bool,

    /// Template values
    pub context: ScaffoldContext,
}

/// Create a report skeleton at `target`.
///
/// Returns the files written, relative to `target`.
pub fn scaffold_report(
    target: &Path,
    options: &ScaffoldOptions,
) -> Result<Vec<PathBuf>, ScaffoldError> {
    if target.exists() {
        if !options.force {
            return Err(ScaffoldError::AlreadyExists(target.display().to_string()));
        }
        tracing::info!("Removing existing {}", target.display());
        fs::remove_dir_all(target).map_err(|e| write_error(target, e))?;
    }

    for dir in [SECTIONS_DIR, "style", "images", "diagrams", "build"] {
        let path = target.join(dir);
        fs::create_dir_all(&path).map_err(|e| write_error(&path, e))?;
    }

    let engine = TemplateEngine::new();
    let render_error = |e: minijinja::Error| ScaffoldError::TemplateError(e.to_string());

    let mut files: Vec<(PathBuf, String)> = vec![
        (
            PathBuf::from("report.html"),
            engine.render_wrapper(&options.context).map_err(render_error)?,
        ),
        (
            PathBuf::from(CONFIG_FILE),
            engine.render_config(&options.context).map_err(render_error)?,
        ),
        (PathBuf::from(".gitignore"), GITIGNORE.to_string()),
        (PathBuf::from("images/.gitkeep"), String::new()),
        (PathBuf::from("diagrams/.gitkeep"), String::new()),
    ];

    for (name, content) in SAMPLE_SECTIONS {
        files.push((Path::new(SECTIONS_DIR).join(name), content.to_string()));
    }

    for role in ThemeRole::ALL {
        files.push((
            Path::new("style").join(role.file_name()),
            starter_stylesheet(role).to_string(),
        ));
    }

    for (relative, content) in &files {
        let path = target.join(relative);
        fs::write(&path, content).map_err(|e| write_error(&path, e))?;
        tracing::debug!("Created {}", path.display());
    }

    Ok(files.into_iter().map(|(relative, _)| relative).collect())
}

/// Turn a directory name into a report title: `quarterly-report` -> `Quarterly Report`.
pub fn title_from_name(name: &str) -> String {
    let words: Vec<String> = name
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();

    if words.is_empty() {
        "New Report".to_string()
    } else {
        words.join(" ")
    }
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn write_error(path: &Path, e: std::io::Error) -> ScaffoldError {
    ScaffoldError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptura_report::{lint_report, ReportConfig};
    use tempfile::tempdir;

    #[test]
    fn creates_full_skeleton() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("report");

        let files = scaffold_report(&target, &ScaffoldOptions::default()).unwrap();

        for dir in ["sections", "style", "images", "diagrams", "build"] {
            assert!(target.join(dir).is_dir(), "missing {dir}/");
        }
        assert!(target.join("report.html").exists());
        assert!(target.join("config.yaml").exists());
        assert!(target.join(".gitignore").exists());
        assert!(target.join("sections/01-introduction.html").exists());
        assert!(target.join("style/last-page.css").exists());
        assert!(files.contains(&PathBuf::from("config.yaml")));
    }

    #[test]
    fn scaffold_passes_lint() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("report");
        scaffold_report(&target, &ScaffoldOptions::default()).unwrap();

        let config = ReportConfig::load(&target.join(CONFIG_FILE)).unwrap();
        let report = lint_report(&target, &config).unwrap();

        assert!(!report.has_errors());
        assert_eq!(report.warnings().count(), 0);
    }

    #[test]
    fn refuses_existing_target_without_force() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("report");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("keep.txt"), "mine").unwrap();

        let result = scaffold_report(&target, &ScaffoldOptions::default());

        assert!(matches!(result, Err(ScaffoldError::AlreadyExists(_))));
        assert!(target.join("keep.txt").exists());
    }

    #[test]
    fn force_replaces_existing_target() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("report");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("stale.txt"), "old").unwrap();

        let options = ScaffoldOptions {
            force: true,
            ..Default::default()
        };
        scaffold_report(&target, &options).unwrap();

        assert!(!target.join("stale.txt").exists());
        assert!(target.join("report.html").exists());
    }

    #[test]
    fn derives_title_from_name() {
        assert_eq!(title_from_name("quarterly-report"), "Quarterly Report");
        assert_eq!(title_from_name("q3_review 2025"), "Q3 Review 2025");
        assert_eq!(title_from_name("--"), "New Report");
    }
}
