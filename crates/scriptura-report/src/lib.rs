//! Report model for scriptura.
//!
//! This crate loads `config.yaml`, discovers section fragments in canonical
//! order, substitutes `[KEY]` placeholders and lints a report directory for
//! structural conventions.

pub mod config;
pub mod lint;
pub mod placeholders;
pub mod sections;
pub mod theme;

pub use config::{ConfigError, ReportConfig, CONFIG_FILE};
pub use lint::{lint_report, lint_section, Finding, LintError, LintReport, Severity};
pub use placeholders::Placeholders;
pub use sections::{discover_section_paths, discover_sections, SectionError, SECTIONS_DIR};
pub use theme::{ThemeConfig, ThemeRole};
