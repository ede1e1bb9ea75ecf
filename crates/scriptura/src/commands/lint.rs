//! Report lint command.

use std::path::Path;

use anyhow::Result;
use scriptura_report::{lint_report, LintReport, ReportConfig};

/// Run the lint command.
pub fn run(config: &Path) -> Result<()> {
    let config_path = ReportConfig::resolve_path(config);
    let report_dir = ReportConfig::base_dir(&config_path);
    let report_config = ReportConfig::load_or_default(&config_path)?;

    let report = lint_report(&report_dir, &report_config)?;
    print_findings(&report);

    let errors = report.errors().count();
    if errors > 0 {
        anyhow::bail!("Lint failed with {} error(s)", errors);
    }

    tracing::info!("Lint passed");
    Ok(())
}

fn print_findings(report: &LintReport) {
    for finding in report.warnings() {
        tracing::warn!("{}", finding);
    }
    for finding in report.errors() {
        tracing::error!("{}", finding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn passes_on_well_formed_report() {
        let temp = tempdir().unwrap();
        let sections = temp.path().join("sections");
        fs::create_dir_all(&sections).unwrap();
        fs::write(
            sections.join("01-intro.html"),
            "<section><h1>Intro</h1><p>Text</p></section>",
        )
        .unwrap();

        assert!(run(temp.path()).is_ok());
    }

    #[test]
    fn fails_on_section_without_heading() {
        let temp = tempdir().unwrap();
        let sections = temp.path().join("sections");
        fs::create_dir_all(&sections).unwrap();
        fs::write(sections.join("01-intro.html"), "<section><p>Text</p></section>").unwrap();

        let err = run(temp.path()).unwrap_err();

        assert_eq!(err.to_string(), "Lint failed with 1 error(s)");
    }
}
