//! Error types for the ADX gateway.

use thiserror::Error;

/// Errors from configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing or empty environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),
}

/// Errors from resource address parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("unsupported address scheme in '{0}'")]
    UnsupportedScheme(String),

    #[error("unknown address authority in '{0}'")]
    UnknownAuthority(String),

    #[error("missing database name in '{0}'")]
    MissingDatabase(String),

    #[error("missing table name in '{0}'")]
    MissingTable(String),

    #[error("unknown config field in '{0}'")]
    UnknownConfigField(String),

    #[error("unexpected trailing segments in '{0}'")]
    TrailingSegments(String),

    #[error("malformed address '{0}'")]
    Malformed(String),
}

/// Errors from the remote execution client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("cluster returned HTTP {status}: {message}")]
    Cluster { status: u16, message: String },

    #[error("malformed cluster response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_lists_every_missing_variable() {
        let err = ConfigError::Missing(vec![
            "ADX_CLUSTER_NAME".to_string(),
            "ADX_CLIENT_SECRET".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("ADX_CLUSTER_NAME"));
        assert!(msg.contains("ADX_CLIENT_SECRET"));
    }

    #[test]
    fn remote_error_messages_carry_detail() {
        let err = RemoteError::Cluster {
            status: 403,
            message: "caller is not authorized".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("not authorized"));
    }
}
