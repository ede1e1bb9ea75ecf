//! Report build pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use scriptura_report::{discover_section_paths, ReportConfig, SectionError, SECTIONS_DIR};

use crate::assembler::assemble;
use crate::assets::{stage_assets, AssetError};
use crate::diagrams::{render_diagrams, DiagramOutcome};
use crate::pdf::{export_pdf, PdfError, PdfOptions, PdfOutcome};
use crate::templates::default_wrapper;

/// Wrapper template file name inside a report directory.
pub const WRAPPER_FILE: &str = "report.html";

/// Configuration for building a report.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Path to config.yaml
    pub config_path: PathBuf,

    /// Assembled HTML output, relative to the report directory unless absolute
    pub html_out: PathBuf,

    /// PDF output, relative to the report directory unless absolute
    pub pdf_out: PathBuf,

    /// Export a PDF after writing the HTML
    pub pdf: bool,

    /// Render diagrams/ sources before assembling
    pub generate_diagrams: bool,

    /// Page settings for PDF export
    pub pdf_options: PdfOptions,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config.yaml"),
            html_out: PathBuf::from("build/report.html"),
            pdf_out: PathBuf::from("build/report.pdf"),
            pdf: false,
            generate_diagrams: false,
            pdf_options: PdfOptions::default(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Assembled HTML file
    pub html_path: PathBuf,

    /// PDF file, when one was written
    pub pdf_path: Option<PathBuf>,

    /// Number of sections inlined
    pub sections: usize,

    /// Declared sections that could not be found
    pub skipped: Vec<String>,

    /// Number of diagrams rendered
    pub diagrams: usize,

    /// Number of asset files copied
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] scriptura_report::ConfigError),

    #[error(transparent)]
    Sections(#[from] SectionError),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error(transparent)]
    Assets(#[from] AssetError),

    #[error("Failed to render diagrams: {0}")]
    DiagramError(String),

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },

    #[error(transparent)]
    Pdf(#[from] PdfError),
}

/// Report builder.
pub struct ReportBuilder {
    config: BuildConfig,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build the report.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let config_path = ReportConfig::resolve_path(&self.config.config_path);
        let report = ReportConfig::load(&config_path)?;
        let base_dir = ReportConfig::base_dir(&config_path);

        let html_path = base_dir.join(&self.config.html_out);
        let out_dir = html_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| base_dir.clone());

        let section_paths = match report.declared_sections() {
            Some(declared) => declared.to_vec(),
            None => discover_section_paths(&base_dir, report.section_glob())?,
        };
        if section_paths.is_empty() {
            tracing::warn!("No sections found in {}", base_dir.join(SECTIONS_DIR).display());
        }

        let placeholders = report.placeholders();
        let mut sections = Vec::with_capacity(section_paths.len());
        let mut skipped = Vec::new();
        for relative in &section_paths {
            match resolve_section(&base_dir, &out_dir, relative) {
                Some(path) => {
                    let html = read(&path)?;
                    sections.push(placeholders.apply(&html));
                }
                None => {
                    tracing::warn!("Section not found (skipping): {}", relative);
                    skipped.push(relative.clone());
                }
            }
        }

        let wrapper_path = base_dir.join(WRAPPER_FILE);
        let wrapper = if wrapper_path.exists() {
            read(&wrapper_path)?
        } else {
            tracing::warn!(
                "No {} in {}, using the built-in wrapper",
                WRAPPER_FILE,
                base_dir.display()
            );
            default_wrapper()
        };

        let assembled = assemble(&wrapper, &report, &sections);

        fs::create_dir_all(&out_dir).map_err(|e| write_error(&out_dir, e))?;
        let assets = stage_assets(&base_dir, &out_dir, &report)?;

        let diagrams = if self.config.generate_diagrams {
            self.render_diagrams(&base_dir, &out_dir)?
        } else {
            0
        };

        fs::write(&html_path, assembled).map_err(|e| write_error(&html_path, e))?;
        tracing::info!("Assembled HTML -> {}", html_path.display());

        let pdf_path = if self.config.pdf {
            let pdf_path = base_dir.join(&self.config.pdf_out);
            match export_pdf(&html_path, &pdf_path, &self.config.pdf_options)? {
                PdfOutcome::Written(path) => {
                    tracing::info!("PDF written -> {}", path.display());
                    Some(path)
                }
                PdfOutcome::Skipped(_) => None,
            }
        } else {
            None
        };

        Ok(BuildResult {
            html_path,
            pdf_path,
            sections: sections.len(),
            skipped,
            diagrams,
            assets,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn render_diagrams(&self, base_dir: &Path, out_dir: &Path) -> Result<usize, BuildError> {
        let source_dir = base_dir.join("diagrams");
        if !source_dir.is_dir() {
            tracing::debug!("No diagrams/ directory, nothing to render");
            return Ok(0);
        }

        let outcomes = render_diagrams(&source_dir, &out_dir.join("images").join("diagrams"))
            .map_err(|e| BuildError::DiagramError(e.to_string()))?;

        Ok(outcomes
            .iter()
            .filter(|o| matches!(o, DiagramOutcome::Rendered(_)))
            .count())
    }
}

/// Find a section file: next to the config first, then next to the HTML output.
fn resolve_section(base_dir: &Path, out_dir: &Path, relative: &str) -> Option<PathBuf> {
    [base_dir.join(relative), out_dir.join(relative)]
        .into_iter()
        .find(|p| p.is_file())
}

fn read(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|e| BuildError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn write_error(path: &Path, e: std::io::Error) -> BuildError {
    BuildError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
