//! Preview server command.

use std::path::PathBuf;

use anyhow::Result;
use scriptura_server::{PreviewServer, PreviewServerConfig};

/// Run the serve command.
pub async fn run(port: u16, directory: PathBuf, open: bool) -> Result<()> {
    let config = PreviewServerConfig {
        directory,
        port,
        open,
        ..Default::default()
    };

    PreviewServer::new(config).start().await?;

    Ok(())
}
