//! Resource address model and parser.
//!
//! Callers select data through a small family of addresses:
//!
//! ```text
//! config://azure-data-explorer-creds            credentials listing
//! config://azure-data-explorer-creds/client-id  one credentials field
//! schema://adx/{db}                             tables in a database
//! schema://adx/{db}/{table}                     one table's schema
//! schema://adx/{db}/functions                   stored functions in a database
//! ```
//!
//! The parser is an explicit walk over the path segments. The literal last
//! segment `functions` takes precedence over interpretation as a table name;
//! that rule is checked before falling through to the table case.

use std::fmt;

use crate::config::ConfigField;
use crate::error::AddressError;

pub const CONFIG_SCHEME: &str = "config://";
pub const SCHEMA_SCHEME: &str = "schema://";

/// Authority segment of `config://` addresses.
pub const CREDS_AUTHORITY: &str = "azure-data-explorer-creds";

/// Authority segment of `schema://` addresses.
pub const SCHEMA_AUTHORITY: &str = "adx";

const FUNCTIONS_SEGMENT: &str = "functions";

/// A parsed resource address, one variant per endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceAddress {
    /// `config://azure-data-explorer-creds`
    Credentials,
    /// `config://azure-data-explorer-creds/{field}`
    CredentialField(ConfigField),
    /// `schema://adx/{db}`
    DatabaseSchema { database: String },
    /// `schema://adx/{db}/{table}`
    TableSchema { database: String, table: String },
    /// `schema://adx/{db}/functions`
    FunctionsList { database: String },
}

impl ResourceAddress {
    /// Parse an address string into its tagged variant.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] for unknown schemes or authorities, missing
    /// or empty path segments, and undecodable percent-escapes.
    pub fn parse(uri: &str) -> Result<Self, AddressError> {
        if let Some(rest) = uri.strip_prefix(CONFIG_SCHEME) {
            return parse_config(uri, rest);
        }
        if let Some(rest) = uri.strip_prefix(SCHEMA_SCHEME) {
            return parse_schema(uri, rest);
        }
        Err(AddressError::UnsupportedScheme(uri.to_string()))
    }

    /// Database a schema-family address targets.
    pub fn database(&self) -> Option<&str> {
        match self {
            ResourceAddress::DatabaseSchema { database }
            | ResourceAddress::TableSchema { database, .. }
            | ResourceAddress::FunctionsList { database } => Some(database),
            _ => None,
        }
    }

    /// Query text a schema-family address translates to.
    ///
    /// Each variant maps to exactly one query: `.show tables` for a
    /// database, `{table} | getschema` for a table, `.show functions` for
    /// the function list. Config addresses do not reach the cluster.
    pub fn query_text(&self) -> Option<String> {
        match self {
            ResourceAddress::DatabaseSchema { .. } => Some(".show tables".to_string()),
            ResourceAddress::TableSchema { table, .. } => Some(format!("{table} | getschema")),
            ResourceAddress::FunctionsList { .. } => Some(".show functions".to_string()),
            ResourceAddress::Credentials | ResourceAddress::CredentialField(_) => None,
        }
    }
}

impl fmt::Display for ResourceAddress {
    /// Canonical string form of the address.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceAddress::Credentials => {
                write!(f, "{CONFIG_SCHEME}{CREDS_AUTHORITY}")
            }
            ResourceAddress::CredentialField(field) => {
                write!(f, "{CONFIG_SCHEME}{CREDS_AUTHORITY}/{}", field.as_str())
            }
            ResourceAddress::DatabaseSchema { database } => {
                write!(f, "{SCHEMA_SCHEME}{SCHEMA_AUTHORITY}/{database}")
            }
            ResourceAddress::TableSchema { database, table } => {
                write!(f, "{SCHEMA_SCHEME}{SCHEMA_AUTHORITY}/{database}/{table}")
            }
            ResourceAddress::FunctionsList { database } => {
                write!(
                    f,
                    "{SCHEMA_SCHEME}{SCHEMA_AUTHORITY}/{database}/{FUNCTIONS_SEGMENT}"
                )
            }
        }
    }
}

fn parse_config(uri: &str, rest: &str) -> Result<ResourceAddress, AddressError> {
    let segments = decode_segments(uri, rest)?;
    match segments.as_slice() {
        [authority] if authority == CREDS_AUTHORITY => Ok(ResourceAddress::Credentials),
        [authority, field] if authority == CREDS_AUTHORITY => ConfigField::parse(field)
            .map(ResourceAddress::CredentialField)
            .ok_or_else(|| AddressError::UnknownConfigField(uri.to_string())),
        [authority, ..] if authority != CREDS_AUTHORITY => {
            Err(AddressError::UnknownAuthority(uri.to_string()))
        }
        [] => Err(AddressError::UnknownAuthority(uri.to_string())),
        _ => Err(AddressError::TrailingSegments(uri.to_string())),
    }
}

fn parse_schema(uri: &str, rest: &str) -> Result<ResourceAddress, AddressError> {
    let segments = decode_segments(uri, rest)?;
    let path = match segments.split_first() {
        Some((authority, path)) if authority == SCHEMA_AUTHORITY => path,
        _ => return Err(AddressError::UnknownAuthority(uri.to_string())),
    };

    match path {
        [] => Err(AddressError::MissingDatabase(uri.to_string())),
        [database] | [database, _] if database.is_empty() => {
            Err(AddressError::MissingDatabase(uri.to_string()))
        }
        [database] => Ok(ResourceAddress::DatabaseSchema {
            database: database.clone(),
        }),
        // The `functions` literal wins over being read as a table name.
        [database, last] if last == FUNCTIONS_SEGMENT => Ok(ResourceAddress::FunctionsList {
            database: database.clone(),
        }),
        [_, table] if table.is_empty() => Err(AddressError::MissingTable(uri.to_string())),
        [database, table] => Ok(ResourceAddress::TableSchema {
            database: database.clone(),
            table: table.clone(),
        }),
        _ => Err(AddressError::TrailingSegments(uri.to_string())),
    }
}

/// Split the post-scheme remainder on `/` and percent-decode each segment.
fn decode_segments(uri: &str, rest: &str) -> Result<Vec<String>, AddressError> {
    rest.split('/')
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|decoded| decoded.into_owned())
                .map_err(|_| AddressError::Malformed(uri.to_string()))
        })
        .collect()
}
