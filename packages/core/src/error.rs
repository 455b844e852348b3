//! Error types for the VLO core.
//!
//! Protocol-level faults (`badVerb`, `idDoesNotExist`, ...) are not errors in
//! this sense: they are part of a successful response and live in
//! [`crate::oaipmh::error`]. `Error` covers the failures that end a request
//! with HTTP 500.

use thiserror::Error;

/// Main error type for the VLO core.
#[derive(Debug, Error)]
pub enum Error {
    /// Database query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A `from`/`until` argument could not be parsed.
    #[error("failed to parse `{argument}` value '{value}': {source}")]
    InvalidDate {
        argument: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// XML serialization of a response failed.
    #[error("XML serialization failed: {0}")]
    XmlSerialization(#[from] quick_xml::SeError),

    /// Table or column name override is not a plain SQL identifier.
    #[error("Invalid SQL identifier: '{0}'")]
    InvalidIdentifier(String),

    /// Missing or malformed configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for VLO core operations.
pub type Result<T> = std::result::Result<T, Error>;
