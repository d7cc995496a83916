//! Error types for esinfo
//!
//! Library code returns [`EsinfoError`]; the binary wraps it in `anyhow`
//! with context and maps it to an exit status.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EsinfoError>;

/// Main error type for the cluster report pipeline
#[derive(Error, Debug)]
pub enum EsinfoError {
    #[error("Unable to create client: {0}")]
    Connection(String),

    #[error("Unable to load CA certificate {path}: {message}")]
    CertificateLoad { path: PathBuf, message: String },

    #[error("Request to {path} failed after {attempts} attempt(s): {last_error}")]
    RetriesExhausted {
        path: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Request to {path} returned status {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Unable to decode response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Unable to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Format {0:?} is not one of csv, json, yml, yaml")]
    UnsupportedFormat(String),

    #[error("{catalog} catalog unavailable: {reason}")]
    CatalogUnavailable {
        catalog: &'static str,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EsinfoError {
    fn from(error: serde_json::Error) -> Self {
        EsinfoError::Serialization(error.to_string())
    }
}

impl From<serde_yaml::Error> for EsinfoError {
    fn from(error: serde_yaml::Error) -> Self {
        EsinfoError::Serialization(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_names_path_and_status() {
        let err = EsinfoError::Status {
            path: "/_data_stream/*".to_string(),
            status: 404,
            body: String::new(),
        };
        let message = err.to_string();
        assert!(message.contains("/_data_stream/*"));
        assert!(message.contains("404"));
    }

    #[test]
    fn test_write_error_keeps_io_source() {
        let err = EsinfoError::Write {
            path: PathBuf::from("indices.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("indices.csv"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
