//! Report build command.

use std::path::PathBuf;

use anyhow::Result;
use scriptura_static::{BuildConfig, ReportBuilder};

/// Arguments of the build command.
#[derive(Debug)]
pub struct BuildArgs {
    pub config: PathBuf,
    pub out: Option<PathBuf>,
    pub html_out: PathBuf,
    pub pdf: bool,
    pub generate_diagrams: bool,
}

impl From<BuildArgs> for BuildConfig {
    fn from(args: BuildArgs) -> Self {
        let defaults = BuildConfig::default();
        Self {
            config_path: args.config,
            pdf: args.pdf || args.out.is_some(),
            pdf_out: args.out.unwrap_or(defaults.pdf_out),
            html_out: args.html_out,
            generate_diagrams: args.generate_diagrams,
            pdf_options: defaults.pdf_options,
        }
    }
}

/// Run the build command.
pub fn run(args: BuildArgs) -> Result<()> {
    tracing::info!("Building report from {}", args.config.display());

    let result = ReportBuilder::new(args.into()).build()?;

    if !result.skipped.is_empty() {
        tracing::warn!("{} section(s) were not found", result.skipped.len());
    }

    tracing::info!(
        "Built {} sections ({} assets, {} diagrams) in {}ms",
        result.sections,
        result.assets,
        result.diagrams,
        result.duration_ms
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(out: Option<&str>, pdf: bool) -> BuildArgs {
        BuildArgs {
            config: PathBuf::from("config.yaml"),
            out: out.map(PathBuf::from),
            html_out: PathBuf::from("build/report.html"),
            pdf,
            generate_diagrams: false,
        }
    }

    #[test]
    fn pdf_is_off_by_default() {
        let config: BuildConfig = args(None, false).into();

        assert!(!config.pdf);
        assert_eq!(config.pdf_out, PathBuf::from("build/report.pdf"));
    }

    #[test]
    fn explicit_out_implies_pdf() {
        let config: BuildConfig = args(Some("dist/final.pdf"), false).into();

        assert!(config.pdf);
        assert_eq!(config.pdf_out, PathBuf::from("dist/final.pdf"));
    }

    #[test]
    fn pdf_flag_uses_default_path() {
        let config: BuildConfig = args(None, true).into();

        assert!(config.pdf);
        assert_eq!(config.pdf_out, PathBuf::from("build/report.pdf"));
    }
}
