//! MCP service: the `query` tool and the config/schema resources.
//!
//! Every failure is converted to a response payload at the handler
//! boundary: an unparseable address becomes an `Invalid URI` text payload,
//! an unconnected handle or a failed remote call becomes an error-described
//! payload (resources) or an error-flagged result (tool). Nothing here
//! aborts the process or other in-flight requests.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde::Deserialize;

use adx_core::{ConfigField, ConfigSnapshot, ResourceAddress};

use crate::handle::RemoteHandle;

/// MCP server exposing one Azure Data Explorer cluster.
#[derive(Clone)]
pub struct AdxMcpService {
    handle: RemoteHandle,
    tool_router: ToolRouter<Self>,
}

/// Request for ad-hoc query execution.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct QueryRequest {
    /// KQL query text, forwarded to the cluster verbatim
    pub query: String,
    /// Database to execute against
    pub db: String,
}

#[tool_router]
impl AdxMcpService {
    /// Create the service around a remote handle.
    ///
    /// Endpoint registration never depends on the handle being connected;
    /// a gateway with no usable client still serves, and remote-dependent
    /// calls fail individually.
    pub fn new(handle: RemoteHandle) -> Self {
        Self {
            handle,
            tool_router: Self::tool_router(),
        }
    }

    /// Execute a caller-supplied query.
    ///
    /// The query text is forwarded unmodified: no sanitization, no
    /// allow-list, no read-only enforcement (see DESIGN.md).
    #[tool(
        description = "Execute a KQL query against a database on the configured Azure Data Explorer cluster"
    )]
    async fn query(
        &self,
        Parameters(req): Parameters<QueryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let executor = match self.handle.executor() {
            Ok(executor) => executor,
            Err(message) => return Ok(CallToolResult::error(vec![Content::text(message)])),
        };

        match executor.execute(&req.db, &req.query).await {
            Ok(result) => Ok(CallToolResult::success(vec![Content::text(
                result.primary_text(),
            )])),
            Err(e) => {
                tracing::warn!(db = %req.db, error = %e, "query tool call failed");
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Query failed: {e}"
                ))]))
            }
        }
    }
}

impl AdxMcpService {
    /// Resolve one resource read. All failures become text payloads.
    pub async fn read_address(&self, uri: &str) -> ReadResourceResult {
        let address = match ResourceAddress::parse(uri) {
            Ok(address) => address,
            Err(e) => {
                tracing::warn!(uri, error = %e, "invalid resource address");
                return text_result(uri, format!("Invalid URI: {uri}"));
            }
        };

        match address {
            ResourceAddress::Credentials => credentials_listing(),
            ResourceAddress::CredentialField(field) => credential_field(uri, field),
            schema => self.read_schema(uri, &schema).await,
        }
    }

    async fn read_schema(&self, uri: &str, address: &ResourceAddress) -> ReadResourceResult {
        let executor = match self.handle.executor() {
            Ok(executor) => executor,
            Err(message) => return text_result(uri, format!("Error: {message}")),
        };

        // Every schema-family variant carries a database and a query.
        let (Some(database), Some(query)) = (address.database(), address.query_text()) else {
            return text_result(uri, format!("Invalid URI: {uri}"));
        };

        match executor.execute(database, &query).await {
            Ok(result) => text_result(uri, result.primary_text()),
            Err(e) => {
                tracing::warn!(uri, error = %e, "remote query failed");
                text_result(uri, format!("Error: {e}"))
            }
        }
    }
}

/// One content entry per configuration field, each under its sub-address,
/// with the secret masked.
fn credentials_listing() -> ReadResourceResult {
    let snapshot = ConfigSnapshot::from_env();
    let contents = ConfigField::ALL
        .into_iter()
        .map(|field| {
            let sub_uri = ResourceAddress::CredentialField(field).to_string();
            ResourceContents::text(
                format!("{}: {}", field.label(), snapshot.display_value(field)),
                sub_uri,
            )
        })
        .collect();
    ReadResourceResult { contents }
}

fn credential_field(uri: &str, field: ConfigField) -> ReadResourceResult {
    let snapshot = ConfigSnapshot::from_env();
    text_result(
        uri,
        format!("{}: {}", field.label(), snapshot.display_value(field)),
    )
}

fn text_result(uri: &str, text: impl Into<String>) -> ReadResourceResult {
    ReadResourceResult {
        contents: vec![ResourceContents::text(text.into(), uri)],
    }
}

fn schema_template(uri_template: &str, name: &str, description: &str) -> ResourceTemplate {
    RawResourceTemplate {
        uri_template: uri_template.to_string(),
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        mime_type: Some("text/plain".to_string()),
        icons: None,
    }
    .no_annotation()
}

#[tool_handler]
impl ServerHandler for AdxMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Azure Data Explorer gateway. Read config:// and schema:// resources \
                 to inspect the cluster, and run ad-hoc KQL with the query tool."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let mut creds = RawResource::new(
            ResourceAddress::Credentials.to_string(),
            "Azure Data Explorer credentials",
        );
        creds.description =
            Some("Connection configuration with the client secret redacted".to_string());
        creds.mime_type = Some("text/plain".to_string());

        Ok(ListResourcesResult {
            resources: vec![creds.no_annotation()],
            next_cursor: None,
            meta: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult {
            resource_templates: vec![
                schema_template(
                    "schema://adx/{db}",
                    "Database tables",
                    "Tables in a database (.show tables)",
                ),
                schema_template(
                    "schema://adx/{db}/{table}",
                    "Table schema",
                    "Schema of one table (getschema)",
                ),
                schema_template(
                    "schema://adx/{db}/functions",
                    "Database functions",
                    "Stored functions in a database (.show functions)",
                ),
            ],
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri, .. }: ReadResourceRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        Ok(self.read_address(&uri).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use adx_core::{QueryExecutor, RemoteError, TabularResult};

    struct MockExecutor {
        calls: Mutex<Vec<(String, String)>>,
        response: Result<TabularResult, RemoteError>,
    }

    impl MockExecutor {
        fn returning(response: Result<TabularResult, RemoteError>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                response,
            })
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QueryExecutor for MockExecutor {
        async fn execute(&self, database: &str, query: &str) -> Result<TabularResult, RemoteError> {
            self.calls
                .lock()
                .unwrap()
                .push((database.to_string(), query.to_string()));
            self.response.clone()
        }
    }

    fn one_table() -> TabularResult {
        serde_json::from_str(
            r#"{"Tables": [{
                "TableName": "Table_0",
                "Columns": [{"ColumnName": "TableName", "DataType": "String", "ColumnType": "string"}],
                "Rows": [["Events"]]
            }]}"#,
        )
        .unwrap()
    }

    fn service_with(executor: Arc<MockExecutor>) -> AdxMcpService {
        AdxMcpService::new(RemoteHandle::connected(executor))
    }

    fn single_text(result: &ReadResourceResult) -> (&str, &str) {
        assert_eq!(result.contents.len(), 1);
        match &result.contents[0] {
            ResourceContents::TextResourceContents { uri, text, .. } => (uri, text),
            other => panic!("expected text contents, got {other:?}"),
        }
    }

    fn tool_json(result: &CallToolResult) -> serde_json::Value {
        serde_json::to_value(result).unwrap()
    }

    #[tokio::test]
    async fn db_address_issues_show_tables() {
        let executor = MockExecutor::returning(Ok(one_table()));
        let service = service_with(Arc::clone(&executor));

        let result = service.read_address("schema://adx/mydb").await;
        let (uri, text) = single_text(&result);
        assert_eq!(uri, "schema://adx/mydb");
        assert!(text.contains("Events"));
        assert_eq!(
            executor.calls(),
            vec![("mydb".to_string(), ".show tables".to_string())]
        );
    }

    #[tokio::test]
    async fn table_address_issues_getschema() {
        let executor = MockExecutor::returning(Ok(one_table()));
        let service = service_with(Arc::clone(&executor));

        service.read_address("schema://adx/mydb/mytable").await;
        assert_eq!(
            executor.calls(),
            vec![("mydb".to_string(), "mytable | getschema".to_string())]
        );
    }

    #[tokio::test]
    async fn functions_address_issues_show_functions() {
        let executor = MockExecutor::returning(Ok(one_table()));
        let service = service_with(Arc::clone(&executor));

        service.read_address("schema://adx/mydb/functions").await;
        assert_eq!(
            executor.calls(),
            vec![("mydb".to_string(), ".show functions".to_string())]
        );
    }

    #[tokio::test]
    async fn invalid_address_becomes_payload_not_error() {
        let executor = MockExecutor::returning(Ok(one_table()));
        let service = service_with(Arc::clone(&executor));

        let result = service.read_address("schema://adx/").await;
        let (_, text) = single_text(&result);
        assert_eq!(text, "Invalid URI: schema://adx/");
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn unconnected_handle_fails_per_request() {
        let service = AdxMcpService::new(RemoteHandle::unconnected());

        let result = service.read_address("schema://adx/mydb").await;
        let (_, text) = single_text(&result);
        assert!(text.starts_with("Error:"));
        assert!(text.contains("not initialized"));

        let result = service
            .query(Parameters(QueryRequest {
                query: "Table1 | take 5".to_string(),
                db: "mydb".to_string(),
            }))
            .await
            .unwrap();
        let json = tool_json(&result);
        assert_eq!(json["isError"], serde_json::json!(true));
    }

    #[tokio::test]
    async fn remote_failure_becomes_error_payload() {
        let executor = MockExecutor::returning(Err(RemoteError::Cluster {
            status: 400,
            message: "Syntax error".to_string(),
        }));
        let service = service_with(Arc::clone(&executor));

        let result = service.read_address("schema://adx/mydb").await;
        let (_, text) = single_text(&result);
        assert!(text.starts_with("Error:"));
        assert!(text.contains("Syntax error"));
    }

    #[tokio::test]
    async fn query_tool_forwards_text_verbatim() {
        let executor = MockExecutor::returning(Ok(one_table()));
        let service = service_with(Arc::clone(&executor));

        let result = service
            .query(Parameters(QueryRequest {
                query: "Table1 | take 5".to_string(),
                db: "mydb".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(
            executor.calls(),
            vec![("mydb".to_string(), "Table1 | take 5".to_string())]
        );
        let json = tool_json(&result);
        assert_ne!(json["isError"], serde_json::json!(true));
        assert!(json["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Events"));
    }

    #[tokio::test]
    async fn query_tool_flags_remote_errors() {
        let executor = MockExecutor::returning(Err(RemoteError::Transport(
            "connection refused".to_string(),
        )));
        let service = service_with(Arc::clone(&executor));

        let result = service
            .query(Parameters(QueryRequest {
                query: "Table1 | take 5".to_string(),
                db: "mydb".to_string(),
            }))
            .await
            .unwrap();

        let json = tool_json(&result);
        assert_eq!(json["isError"], serde_json::json!(true));
        assert!(json["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }

    #[tokio::test]
    async fn credentials_listing_masks_secret() {
        // Single test owns all env manipulation to avoid races between
        // parallel tests.
        std::env::set_var("ADX_CLUSTER_NAME", "mycluster");
        std::env::set_var("ADX_CLIENT_ID", "client");
        std::env::set_var("ADX_CLIENT_SECRET", "raw-secret-value");
        std::env::set_var("ADX_TENANT_ID", "tenant");

        let service = AdxMcpService::new(RemoteHandle::unconnected());
        let result = service
            .read_address("config://azure-data-explorer-creds")
            .await;
        assert_eq!(result.contents.len(), 4);

        let mut rendered = String::new();
        for contents in &result.contents {
            match contents {
                ResourceContents::TextResourceContents { uri, text, .. } => {
                    assert!(uri.starts_with("config://azure-data-explorer-creds/"));
                    rendered.push_str(text);
                    rendered.push('\n');
                }
                other => panic!("expected text contents, got {other:?}"),
            }
        }
        assert!(rendered.contains("Cluster Name: mycluster"));
        assert!(rendered.contains("Client Secret: ********"));
        assert!(!rendered.contains("raw-secret-value"));

        let result = service
            .read_address("config://azure-data-explorer-creds/client-secret")
            .await;
        let (_, text) = single_text(&result);
        assert_eq!(text, "Client Secret: ********");

        std::env::remove_var("ADX_CLIENT_SECRET");
        let result = service
            .read_address("config://azure-data-explorer-creds/client-secret")
            .await;
        let (_, text) = single_text(&result);
        assert_eq!(text, "Client Secret: Not set");
    }

    #[tokio::test]
    async fn exposes_resources_and_tools_capabilities() {
        let service = AdxMcpService::new(RemoteHandle::unconnected());
        let info = service.get_info();
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some());
    }
}
