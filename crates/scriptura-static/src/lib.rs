//! Report output for scriptura.
//!
//! Scaffolds report directories, assembles the wrapper and section fragments
//! into a single HTML document, stages assets and diagrams next to it and
//! optionally prints it to PDF through headless Chromium.

pub mod assembler;
pub mod assets;
pub mod builder;
pub mod diagrams;
pub mod pdf;
pub mod scaffold;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, ReportBuilder};
pub use pdf::{PdfOptions, PdfOutcome};
pub use scaffold::{scaffold_report, title_from_name, ScaffoldError, ScaffoldOptions};
pub use templates::ScaffoldContext;
