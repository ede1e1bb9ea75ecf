//! Rendering of Mermaid and PlantUML sources via their CLIs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Diagram source kinds and the tool that renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    /// `.mmd`, rendered by `mmdc` to SVG
    Mermaid,
    /// `.puml`, rendered by `plantuml` to PNG
    PlantUml,
}

impl DiagramKind {
    /// Classify a source file by extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("mmd") => Some(Self::Mermaid),
            Some("puml") => Some(Self::PlantUml),
            _ => None,
        }
    }

    /// Executable name of the rendering tool.
    pub fn program(&self) -> &'static str {
        match self {
            Self::Mermaid => "mmdc",
            Self::PlantUml => "plantuml",
        }
    }

    /// Arguments rendering `input` into `out_dir`.
    pub fn args(&self, input: &Path, out_dir: &Path) -> Vec<String> {
        match self {
            Self::Mermaid => {
                let stem = input
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("diagram");
                vec![
                    "-i".to_string(),
                    input.display().to_string(),
                    "-o".to_string(),
                    out_dir.join(format!("{}.svg", stem)).display().to_string(),
                ]
            }
            Self::PlantUml => vec![
                "-tpng".to_string(),
                "-o".to_string(),
                out_dir.display().to_string(),
                input.display().to_string(),
            ],
        }
    }
}

/// Outcome of rendering one diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramOutcome {
    Rendered(PathBuf),
    /// Tool not installed
    ToolMissing(PathBuf),
    /// Tool ran but failed
    Failed(PathBuf),
}

/// Render every diagram in `source_dir` into `out_dir`.
///
/// Tool problems are logged as warnings and never fail the build; only an
/// unreadable source directory or an uncreatable output directory does.
pub fn render_diagrams(source_dir: &Path, out_dir: &Path) -> std::io::Result<Vec<DiagramOutcome>> {
    let mut sources: Vec<(DiagramKind, PathBuf)> = fs::read_dir(source_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter_map(|p| DiagramKind::from_path(&p).map(|kind| (kind, p)))
        .collect();
    sources.sort_by(|a, b| a.1.cmp(&b.1));

    if sources.is_empty() {
        return Ok(Vec::new());
    }

    fs::create_dir_all(out_dir)?;

    // PlantUML resolves a relative -o against the input file.
    let out_dir = out_dir.canonicalize().unwrap_or_else(|_| out_dir.to_path_buf());

    let outcomes = sources
        .into_iter()
        .map(|(kind, source)| render_one(kind.program(), kind, &source, &out_dir))
        .collect();
    Ok(outcomes)
}

/// Run `program` on one source; `program` is normally `kind.program()`.
fn render_one(
    program: &str,
    kind: DiagramKind,
    source: &Path,
    out_dir: &Path,
) -> DiagramOutcome {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let status = Command::new(program)
        .args(kind.args(source, out_dir))
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status();

    match status {
        Ok(status) if status.success() => {
            tracing::info!("Rendered diagram {}", name);
            DiagramOutcome::Rendered(source.to_path_buf())
        }
        Ok(status) => {
            tracing::warn!("{} failed on {} ({})", program, name, status);
            DiagramOutcome::Failed(source.to_path_buf())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("{} is not installed, skipping {}", program, name);
            DiagramOutcome::ToolMissing(source.to_path_buf())
        }
        Err(e) => {
            tracing::warn!("Failed to run {} on {}: {}", program, name, e);
            DiagramOutcome::Failed(source.to_path_buf())
        }
    }
}
