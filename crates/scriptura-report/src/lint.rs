//! Structural checks for a report directory.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::ReportConfig;
use crate::sections::{discover_sections, SectionError, SECTIONS_DIR};
use crate::theme::ThemeRole;

static SECTION_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<section\b[^>]*>").expect("Invalid section regex"));

static SECTION_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</section\s*>").expect("Invalid section close regex"));

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h([1-6])\b[^>]*>").expect("Invalid heading regex"));

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("Invalid comment regex"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A single lint finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,

    /// Section file the finding refers to, if any
    pub file: Option<String>,

    pub message: String,
}

impl Finding {
    fn error(file: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            file: file.map(str::to_string),
            message: message.into(),
        }
    }

    fn warning(file: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            file: file.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}: {}", file, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// All findings for one lint run.
#[derive(Debug, Clone, Default)]
pub struct LintReport {
    pub findings: Vec<Finding>,
}

impl LintReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    /// True when at least one error (not warning) was recorded.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

/// Errors that stop a lint run entirely.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error(transparent)]
    Sections(#[from] SectionError),
}

/// Lint a report directory.
pub fn lint_report(report_dir: &Path, config: &ReportConfig) -> Result<LintReport, LintError> {
    let mut report = LintReport::default();
    let sections_dir = report_dir.join(SECTIONS_DIR);

    if !sections_dir.is_dir() {
        report
            .findings
            .push(Finding::error(None, "sections/ directory is missing"));
    } else {
        let names = discover_sections(&sections_dir, config.section_glob())?;

        if names.is_empty() {
            report.findings.push(Finding::error(
                None,
                format!("sections/ has no files matching {}", config.section_glob()),
            ));
        }

        let mut lexical = names.clone();
        lexical.sort();
        if lexical != names {
            report.findings.push(Finding::warning(
                None,
                "file order (01-, 02-, ...) differs from plain name order",
            ));
        }

        for name in &names {
            let path = sections_dir.join(name);
            match fs::read_to_string(&path) {
                Ok(html) => report.findings.extend(lint_section(name, &html)),
                Err(e) => report
                    .findings
                    .push(Finding::error(Some(name.as_str()), format!("cannot read file: {}", e))),
            }
        }
    }

    if let Some(declared) = config.declared_sections() {
        for path in declared {
            if !report_dir.join(path).is_file() {
                report
                    .findings
                    .push(Finding::error(Some(path.as_str()), "declared in config but not found"));
            }
        }
    }

    let style_dir = report_dir.join(config.local_theme_dir());
    for role in ThemeRole::ALL {
        if config.external_theme_override(role).is_some() {
            continue;
        }
        if !style_dir.join(role.file_name()).is_file() {
            report.findings.push(Finding::warning(
                None,
                format!(
                    "{}/{} is missing",
                    config.local_theme_dir(),
                    role.file_name()
                ),
            ));
        }
    }

    Ok(report)
}

/// Lint one section fragment.
pub fn lint_section(name: &str, html: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let html = COMMENT_RE.replace_all(html, "");

    let Some(open) = SECTION_OPEN_RE.find(&html) else {
        findings.push(Finding::error(Some(name), "missing <section> container"));
        return findings;
    };

    let end = SECTION_CLOSE_RE
        .find_iter(&html)
        .last()
        .map(|m| m.start())
        .filter(|end| *end >= open.end())
        .unwrap_or(html.len());
    let container = &html[open.end()..end];

    let levels: Vec<u8> = HEADING_RE
        .captures_iter(container)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();

    if !levels.contains(&1) {
        findings.push(Finding::error(Some(name), "missing h1"));
    }

    if TAG_RE.replace_all(container, "").trim().is_empty() {
        findings.push(Finding::error(Some(name), "section content is empty"));
    }

    let mut last = 0u8;
    for level in levels {
        if last != 0 && level > last + 1 {
            findings.push(Finding::error(
                Some(name),
                format!("heading hierarchy skips a level (h{} -> h{})", last, level),
            ));
            break;
        }
        last = level;
    }

    findings
}
