//! Copying report assets next to the assembled HTML.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use scriptura_report::ReportConfig;

/// Errors that can occur while staging assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to copy {from} to {to}: {message}")]
    CopyError {
        from: String,
        to: String,
        message: String,
    },
}

/// Copy `images/` and the local theme directory into `out_dir`.
///
/// Returns the number of files copied. Nothing is copied when `out_dir` is
/// the report directory itself.
pub fn stage_assets(
    report_dir: &Path,
    out_dir: &Path,
    config: &ReportConfig,
) -> Result<usize, AssetError> {
    if same_dir(report_dir, out_dir) {
        tracing::debug!("Output directory is the report directory, not copying assets");
        return Ok(0);
    }

    let mut copied = 0;
    for dir in ["images", config.local_theme_dir()] {
        let source = report_dir.join(dir);
        if !source.is_dir() {
            tracing::debug!("No {} directory, skipping", source.display());
            continue;
        }
        copied += copy_dir(&source, &out_dir.join(dir))?;
    }
    Ok(copied)
}

/// Recursively copy the files of `from` into `to`, creating directories.
pub fn copy_dir(from: &Path, to: &Path) -> Result<usize, AssetError> {
    let mut copied = 0;

    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.map_err(|e| AssetError::ReadError {
            path: from.display().to_string(),
            message: e.to_string(),
        })?;

        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);

        let copy_error = |e: std::io::Error| AssetError::CopyError {
            from: entry.path().display().to_string(),
            to: target.display().to_string(),
            message: e.to_string(),
        };

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(copy_error)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(copy_error)?;
            }
            fs::copy(entry.path(), &target).map_err(copy_error)?;
            copied += 1;
        }
    }

    Ok(copied)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
