//! Section file discovery and canonical ordering.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use globset::Glob;

/// Directory holding section fragments, relative to the report directory.
pub const SECTIONS_DIR: &str = "sections";

/// Sort key for files without a numeric prefix.
const UNNUMBERED: u64 = 1_000_000;

/// Errors that can occur during discovery.
#[derive(Debug, thiserror::Error)]
pub enum SectionError {
    #[error("Sections directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Failed to read sections directory {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Invalid section glob '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },
}

/// Numeric prefix before the first `-` or `_`, e.g. `02-results.html` -> 2.
fn numeric_prefix(name: &str) -> Option<u64> {
    let digits: &str = &name[..name.find(|c: char| !c.is_ascii_digit()).unwrap_or(name.len())];
    if digits.is_empty() {
        return None;
    }
    match name[digits.len()..].chars().next() {
        Some('-') | Some('_') => digits.parse().ok(),
        _ => None,
    }
}

/// Compare two section file names in canonical order.
pub fn compare_section_names(a: &str, b: &str) -> Ordering {
    let key = |name: &str| (numeric_prefix(name).unwrap_or(UNNUMBERED), name.to_lowercase());
    key(a).cmp(&key(b)).then_with(|| a.cmp(b))
}

/// Sort section file names in canonical order.
pub fn sort_section_names(names: &mut [String]) {
    names.sort_by(|a, b| compare_section_names(a, b));
}

/// List file names in `dir` matching `pattern`, in canonical order.
///
/// Only regular files directly inside `dir` are considered.
pub fn discover_sections(dir: &Path, pattern: &str) -> Result<Vec<String>, SectionError> {
    if !dir.is_dir() {
        return Err(SectionError::DirectoryNotFound(dir.display().to_string()));
    }

    let matcher = Glob::new(pattern)
        .map_err(|e| SectionError::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?
        .compile_matcher();

    let read_error = |e: std::io::Error| SectionError::ReadError {
        path: dir.display().to_string(),
        message: e.to_string(),
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        if !entry.path().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if matcher.is_match(&name) {
            names.push(name);
        }
    }

    sort_section_names(&mut names);
    Ok(names)
}

/// Discover sections under `<report_dir>/sections` as report-relative paths
/// (`sections/<name>`).
pub fn discover_section_paths(
    report_dir: &Path,
    pattern: &str,
) -> Result<Vec<String>, SectionError> {
    let names = discover_sections(&report_dir.join(SECTIONS_DIR), pattern)?;
    Ok(names
        .into_iter()
        .map(|name| format!("{}/{}", SECTIONS_DIR, name))
        .collect())
}
