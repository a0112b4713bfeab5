use std::net::AddrParseError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid port value: '{value}' (must be 1-65535)")]
    InvalidPort { value: String },

    #[error("invalid value for {var}: '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("invalid bind address: '{value}'")]
    InvalidBindAddr {
        value: String,
        source: AddrParseError,
    },

    #[error("path not found: {path:?}")]
    PathNotFound { path: PathBuf },

    #[error("path is not a file: {path:?}")]
    NotAFile { path: PathBuf },

    #[error("{name} out of range: {reason}")]
    OutOfRange {
        name: &'static str,
        reason: String,
    },
}
