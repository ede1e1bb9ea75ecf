//! Scaffold a new report directory.

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use scriptura_static::{scaffold_report, title_from_name, ScaffoldContext, ScaffoldOptions};

/// Run the init command.
pub fn run(name: &str, force: bool, git: bool) -> Result<()> {
    let target = Path::new(name);

    let options = ScaffoldOptions {
        force,
        context: ScaffoldContext {
            title: title_from_name(
                target
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(name),
            ),
            ..Default::default()
        },
    };

    let files = scaffold_report(target, &options)?;
    tracing::debug!("Wrote {} files", files.len());

    if git {
        init_git(target).context("Failed to initialise git repository")?;
    }

    tracing::info!("Scaffold created at ./{}", name);
    tracing::info!("Run 'scriptura build --config {}/config.yaml' to assemble it.", name);

    Ok(())
}

/// Run `git init` in `dir` unless it is already inside a work tree.
///
/// A missing git binary is only a warning.
fn init_git(dir: &Path) -> Result<()> {
    let inside = Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match inside {
        Ok(status) if status.success() => {
            tracing::debug!("{} is already inside a git work tree", dir.display());
            return Ok(());
        }
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("git is not installed, skipping repository initialisation");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let status = Command::new("git")
        .arg("init")
        .current_dir(dir)
        .stdout(Stdio::null())
        .status()?;

    if status.success() {
        tracing::info!("Initialised git repository in {}", dir.display());
    } else {
        tracing::warn!("git init exited with {}", status);
    }

    Ok(())
}
