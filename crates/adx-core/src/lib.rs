//! # adx-core
//!
//! Core types for the ADX gateway:
//! - [`GatewayConfig`] / [`ConfigSnapshot`] — environment-driven configuration
//! - [`ResourceAddress`] — the tagged address model and its parser
//! - [`TabularResult`] — query results and their text rendering
//! - [`QueryExecutor`] — the seam to the remote execution client
//! - Error hierarchy ([`ConfigError`], [`AddressError`], [`RemoteError`])

pub mod address;
pub mod config;
pub mod error;
pub mod executor;
pub mod result;

pub use address::ResourceAddress;
pub use config::{ConfigField, ConfigSnapshot, GatewayConfig, NOT_SET, SECRET_MASK};
pub use error::{AddressError, ConfigError, RemoteError};
pub use executor::QueryExecutor;
pub use result::{ColumnSchema, ResultTable, TabularResult};
