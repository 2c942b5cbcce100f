//! Kusto REST client with application-key authentication.
//!
//! Each call acquires an AAD token via the client-credentials flow and posts
//! the query to the cluster's v1 REST API. Management commands (leading `.`)
//! go to the management endpoint, data queries to the query endpoint.
//!
//! The client keeps no cross-request state: no token cache, no retries, no
//! client-side timeouts. A hung remote call hangs the corresponding request.

use async_trait::async_trait;
use serde::Deserialize;

use adx_core::{GatewayConfig, QueryExecutor, RemoteError, TabularResult};

const MGMT_PATH: &str = "/v1/rest/mgmt";
const QUERY_PATH: &str = "/v1/rest/query";

/// Client for one cluster, built from validated startup configuration.
/// No `Debug` impl: the client carries the application secret.
#[derive(Clone)]
pub struct KustoClient {
    http: reqwest::Client,
    cluster_url: String,
    client_id: String,
    client_secret: String,
    tenant_id: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl KustoClient {
    /// Build a client for the configured cluster.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: &GatewayConfig) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            cluster_url: config.cluster_url(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            tenant_id: config.tenant_id.clone(),
        })
    }

    /// Cluster endpoint this client talks to.
    pub fn cluster_url(&self) -> &str {
        &self.cluster_url
    }

    /// Acquire a bearer token for the cluster via the client-credentials
    /// flow.
    async fn acquire_token(&self) -> Result<String, RemoteError> {
        let token_url = format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
            self.tenant_id
        );
        let scope = format!("{}/.default", self.cluster_url);
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope.as_str()),
        ];

        let response = self
            .http
            .post(&token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Auth(format!(
                "token endpoint returned HTTP {}: {body}",
                status.as_u16()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Auth(format!("unreadable token response: {e}")))?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl QueryExecutor for KustoClient {
    async fn execute(&self, database: &str, query: &str) -> Result<TabularResult, RemoteError> {
        let token = self.acquire_token().await?;
        let url = format!("{}{}", self.cluster_url, endpoint_path(query));
        let body = serde_json::json!({ "db": database, "csl": query });

        tracing::debug!(database, url = %url, "executing query");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Cluster {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<TabularResult>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

/// Route a query to the management or query endpoint by its leading
/// character. `.show tables` is a management command; `Events | take 5`
/// is a data query.
fn endpoint_path(query: &str) -> &'static str {
    if query.trim_start().starts_with('.') {
        MGMT_PATH
    } else {
        QUERY_PATH
    }
}
