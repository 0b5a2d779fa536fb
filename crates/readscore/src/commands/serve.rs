//! Serve command: run the MCP server on stdio.

use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use readscore_core::Config;

use crate::server::ReadscoreServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    // Transport is always stdio; scoring defaults come from the loaded config
}

/// Serve MCP requests on stdin/stdout until the client disconnects.
///
/// Logging must stay off stdout while this runs; the stderr and file layers
/// set up in `main` are unaffected.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(_args: ServeArgs, config: Config) -> anyhow::Result<()> {
    info!(
        variant = ?config.variant,
        max_input = ?config.input_limit(),
        "starting MCP server on stdio"
    );

    let service = ReadscoreServer::with_config(&config)
        .serve(rmcp::transport::stdio())
        .await?;
    service.waiting().await?;

    info!("MCP server stopped");
    Ok(())
}
