//! DFR MCP Server - Rust Implementation
//!
//! A Model Context Protocol (MCP) server exposing the DFR project's PRP
//! documents and directory layout over stdio. Logs go to stderr; stdout is
//! reserved for the protocol.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use dfr_mcp_server::config::{layout, Config};
use dfr_mcp_server::error::Result;
use dfr_mcp_server::mcp::server::McpServer;
use dfr_mcp_server::mcp::tools::Registrar;
use dfr_mcp_server::project::files::ProjectFiles;

/// DFR MCP Server
#[derive(Parser)]
#[command(name = "dfr-mcp-server")]
#[command(author, version, about = "DFR MCP Server - A Model Context Protocol server for the DFR project")]
struct Cli {
    /// Install root containing PRPs/, src/, assets/ and docs/
    /// (defaults to $DFR_PROJECT_ROOT, then the current directory)
    #[arg(short, long)]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::new(cli.root)?;
    tracing::info!(root = %config.project_root.display(), "Using project root");

    if !config.documents_dir_exists() {
        tracing::warn!(
            "{} directory not found under {}",
            layout::DOCUMENTS_DIR,
            config.project_root.display()
        );
    }

    let files = Arc::new(ProjectFiles::new(config));

    // Register tools and run MCP server
    Registrar::new(files).serve(McpServer::new()).await?;

    Ok(())
}
