//! Error types for parser construction and configuration
//!
//! Parsing itself never fails; errors only come from building the catalogs,
//! loading configuration, or serializing results.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid pattern `{pattern}` in {context}")]
    Pattern {
        context: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("serialization failed")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ParserError>;

/// Compile a pattern, attaching where it came from on failure
pub(crate) fn compile(context: &str, pattern: &str) -> Result<regex::Regex> {
    regex::Regex::new(pattern).map_err(|source| ParserError::Pattern {
        context: context.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}
