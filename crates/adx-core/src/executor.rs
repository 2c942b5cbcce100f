//! The remote execution seam.

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::result::TabularResult;

/// Runs a query string against a named database on the remote cluster.
///
/// Handlers depend only on this trait; the concrete client is constructed
/// once at startup and injected. Implementations must be usable from
/// concurrent requests without interior mutation.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute `query` against `database` and return the tabular response.
    async fn execute(&self, database: &str, query: &str) -> Result<TabularResult, RemoteError>;
}
