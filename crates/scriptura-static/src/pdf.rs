//! PDF export through headless Chromium.

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

/// Millimetres per inch, for the printer margins.
const MM_PER_INCH: f64 = 25.4;

/// Page and timing settings for PDF export.
#[derive(Debug, Clone)]
pub struct PdfOptions {
    /// Paper width in inches (A4)
    pub paper_width: f64,
    /// Paper height in inches (A4)
    pub paper_height: f64,
    /// Margins in millimetres: top, right, bottom, left
    pub margins_mm: [f64; 4],
    /// Print CSS backgrounds
    pub print_background: bool,
    /// Fixed delay after load before polling for readiness
    pub settle_delay: Duration,
    /// Upper bound on waiting for the pagination script
    pub ready_timeout: Duration,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            paper_width: 210.0 / MM_PER_INCH,
            paper_height: 297.0 / MM_PER_INCH,
            margins_mm: [18.0, 18.0, 20.0, 18.0],
            print_background: true,
            settle_delay: Duration::from_millis(1500),
            ready_timeout: Duration::from_secs(10),
        }
    }
}

/// What happened to a PDF export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfOutcome {
    /// PDF written to this path
    Written(PathBuf),
    /// No usable browser; the HTML is still a valid build
    Skipped(String),
}

/// Errors after a browser was successfully launched.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Failed to load {path} in browser: {message}")]
    LoadError { path: String, message: String },

    #[error("Failed to print PDF: {0}")]
    PrintError(String),

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },
}

/// Readiness probe run in the page: `absent`, `pending` or `ready`.
#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
const READY_PROBE: &str = r#"(() => {
  if (typeof window.Paged === "undefined" && typeof window.PagedPolyfill === "undefined") {
    return "absent";
  }
  return (window.Paged && window.Paged.ready) ? "ready" : "pending";
})()"#;

/// `file://` URL for a local path.
pub fn file_url(path: &Path) -> String {
    let absolute = path
        .canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf());

    match Url::from_file_path(&absolute) {
        Ok(url) => url.to_string(),
        Err(()) => format!("file://{}", absolute.display()),
    }
}

/// Render `html_path` to `pdf_path`.
#[cfg(feature = "pdf")]
pub fn export_pdf(
    html_path: &Path,
    pdf_path: &Path,
    options: &PdfOptions,
) -> Result<PdfOutcome, PdfError> {
    use headless_chrome::types::PrintToPdfOptions;
    use headless_chrome::{Browser, LaunchOptions};

    let launch = match LaunchOptions::default_builder().headless(true).build() {
        Ok(launch) => launch,
        Err(e) => return Ok(skip(format!("invalid browser options: {}", e))),
    };

    let browser = match Browser::new(launch) {
        Ok(browser) => browser,
        Err(e) => return Ok(skip(format!("could not launch Chromium: {}", e))),
    };

    let load_error = |e: &dyn std::fmt::Display| PdfError::LoadError {
        path: html_path.display().to_string(),
        message: e.to_string(),
    };

    let tab = browser.new_tab().map_err(|e| load_error(&e))?;
    let url = file_url(html_path);
    tracing::debug!("Loading {}", url);
    tab.navigate_to(&url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| load_error(&e))?;

    std::thread::sleep(options.settle_delay);
    wait_for_pagination(options.ready_timeout, || {
        tab.evaluate(READY_PROBE, false)
            .ok()
            .and_then(|obj| obj.value)
            .and_then(|v| v.as_str().map(str::to_string))
    });

    let [top, right, bottom, left] = options.margins_mm.map(|mm| mm / MM_PER_INCH);
    let bytes = tab
        .print_to_pdf(Some(PrintToPdfOptions {
            print_background: Some(options.print_background),
            paper_width: Some(options.paper_width),
            paper_height: Some(options.paper_height),
            margin_top: Some(top),
            margin_right: Some(right),
            margin_bottom: Some(bottom),
            margin_left: Some(left),
            ..Default::default()
        }))
        .map_err(|e| PdfError::PrintError(e.to_string()))?;

    write_pdf(pdf_path, &bytes)?;
    Ok(PdfOutcome::Written(pdf_path.to_path_buf()))
}

/// Render `html_path` to `pdf_path`.
///
/// Built without the `pdf` feature: always skipped.
#[cfg(not(feature = "pdf"))]
pub fn export_pdf(
    _html_path: &Path,
    _pdf_path: &Path,
    _options: &PdfOptions,
) -> Result<PdfOutcome, PdfError> {
    Ok(skip(
        "built without the `pdf` feature; rebuild with `--features pdf`".to_string(),
    ))
}

fn skip(reason: String) -> PdfOutcome {
    tracing::warn!("PDF export skipped: {}", reason);
    tracing::warn!("The HTML was still written; print it to PDF from a browser instead.");
    PdfOutcome::Skipped(reason)
}

/// Poll `probe` until it reports `ready` or `absent`, or `timeout` elapses.
///
/// Returns true when pagination reported ready.
#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
fn wait_for_pagination(timeout: Duration, mut probe: impl FnMut() -> Option<String>) -> bool {
    let poll = Duration::from_millis(100);
    let start = std::time::Instant::now();

    loop {
        match probe().as_deref() {
            Some("ready") => return true,
            Some("absent") => {
                tracing::debug!("No pagination script detected");
                return false;
            }
            _ => {}
        }
        if start.elapsed() >= timeout {
            tracing::warn!(
                "Pagination did not report ready within {}s, printing anyway",
                timeout.as_secs()
            );
            return false;
        }
        std::thread::sleep(poll);
    }
}

#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
fn write_pdf(pdf_path: &Path, bytes: &[u8]) -> Result<(), PdfError> {
    let write_error = |e: std::io::Error| PdfError::WriteError {
        path: pdf_path.display().to_string(),
        message: e.to_string(),
    };
    if let Some(parent) = pdf_path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(pdf_path, bytes).map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_a4_with_report_margins() {
        let options = PdfOptions::default();

        assert!((options.paper_width - 8.27).abs() < 0.01);
        assert!((options.paper_height - 11.69).abs() < 0.01);
        assert_eq!(options.margins_mm, [18.0, 18.0, 20.0, 18.0]);
        assert_eq!(options.settle_delay, Duration::from_millis(1500));
    }

    #[test]
    fn builds_file_urls() {
        let url = file_url(Path::new("/tmp/my report/report.html"));
        assert_eq!(url, "file:///tmp/my%20report/report.html");

        let url = file_url(Path::new("/tmp/C#-reports/v2?/report.html"));
        assert_eq!(url, "file:///tmp/C%23-reports/v2%3F/report.html");
        assert_eq!(
            Url::parse(&url).unwrap().to_file_path().unwrap(),
            PathBuf::from("/tmp/C#-reports/v2?/report.html")
        );
    }

    #[test]
    fn stops_waiting_when_ready() {
        let mut calls = 0;
        let ready = wait_for_pagination(Duration::from_secs(5), || {
            calls += 1;
            Some(if calls < 3 { "pending" } else { "ready" }.to_string())
        });

        assert!(ready);
        assert_eq!(calls, 3);
    }

    #[test]
    fn stops_waiting_when_no_pagination_script() {
        let ready = wait_for_pagination(Duration::from_secs(5), || Some("absent".to_string()));
        assert!(!ready);
    }

    #[test]
    fn gives_up_after_timeout() {
        let ready = wait_for_pagination(Duration::from_millis(150), || None);
        assert!(!ready);
    }

    #[test]
    fn writes_pdf_creating_parent_dirs() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("build/nested/report.pdf");

        write_pdf(&path, b"%PDF-1.7").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7");
    }
}
