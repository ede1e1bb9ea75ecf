//! Scriptura CLI - modular HTML reports paginated with Paged.js.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "scriptura")]
#[command(about = "Assemble modular HTML reports and export them to PDF")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new report skeleton in ./<NAME>
    Init {
        /// Directory name of the new report
        #[arg(default_value = "report")]
        name: String,

        /// Remove an existing directory and scaffold again
        #[arg(long)]
        force: bool,

        /// Initialise a git repository (default)
        #[arg(long, overrides_with = "no_git")]
        git: bool,

        /// Do not initialise a git repository
        #[arg(long, overrides_with = "git")]
        no_git: bool,
    },

    /// Assemble sections into one HTML file and optionally export a PDF
    Build {
        /// Path to config.yaml (or the report directory)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// PDF output path, relative to the config directory (implies --pdf)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Assembled HTML path, relative to the config directory
        #[arg(long, default_value = "build/report.html")]
        html_out: PathBuf,

        /// Export a PDF through headless Chromium
        #[arg(long)]
        pdf: bool,

        /// Render diagrams/*.mmd and diagrams/*.puml first
        #[arg(long)]
        generate_diagrams: bool,
    },

    /// Check sections for structure: container, <h1>, heading levels, order
    Lint {
        /// Path to config.yaml (or the report directory)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,
    },

    /// Serve a directory over HTTP for preview
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "build")]
        directory: PathBuf,

        /// Open the browser once the server is listening
        #[arg(long)]
        open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init {
            name,
            force,
            git: _,
            no_git,
        } => {
            commands::init::run(&name, force, !no_git)?;
        }
        Commands::Build {
            config,
            out,
            html_out,
            pdf,
            generate_diagrams,
        } => {
            commands::build::run(commands::build::BuildArgs {
                config,
                out,
                html_out,
                pdf,
                generate_diagrams,
            })?;
        }
        Commands::Lint { config } => {
            commands::lint::run(&config)?;
        }
        Commands::Serve {
            port,
            directory,
            open,
        } => {
            commands::serve::run(port, directory, open).await?;
        }
    }

    Ok(())
}
