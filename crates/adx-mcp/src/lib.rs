//! # adx-mcp
//!
//! MCP (Model Context Protocol) server for the ADX gateway.
//!
//! Exposes one Azure Data Explorer cluster over stdio:
//! - `config://azure-data-explorer-creds[/<field>]` — connection
//!   configuration, secret redacted
//! - `schema://adx/{db}` — tables in a database
//! - `schema://adx/{db}/{table}` — one table's schema
//! - `schema://adx/{db}/functions` — stored functions in a database
//! - `query` tool — ad-hoc KQL against a named database

pub mod handle;
pub mod service;

pub use handle::RemoteHandle;
pub use service::AdxMcpService;

use rmcp::{transport::stdio, ServiceExt};

/// Serve the MCP protocol over stdio until the peer disconnects, then
/// release the remote handle.
pub async fn serve_stdio(handle: RemoteHandle) -> anyhow::Result<()> {
    let service = AdxMcpService::new(handle.clone());

    tracing::info!("MCP server listening on stdio");
    let running = service.serve(stdio()).await?;
    running.waiting().await?;

    handle.close();
    Ok(())
}
