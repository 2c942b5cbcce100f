//! # adx-client
//!
//! HTTP client for Azure Data Explorer's v1 REST API, implementing the
//! [`adx_core::QueryExecutor`] seam with application-key authentication.

pub mod kusto;

pub use kusto::KustoClient;
