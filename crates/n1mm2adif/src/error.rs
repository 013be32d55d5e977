//! Error types for n1mm2adif.
//!
//! Only configuration and listener setup errors are fatal. Everything raised
//! while handling a single contact is logged by the pipeline and dropped.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for n1mm2adif operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Inbound Errors ===
    /// An inbound payload could not be decoded.
    #[error("failed to decode payload: {message}")]
    Decode {
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to bind the listening socket.
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        /// Address the listener tried to bind.
        addr: SocketAddr,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to join the configured multicast group.
    #[error("failed to join multicast group {group}: {source}")]
    MulticastJoin {
        /// The multicast group address.
        group: std::net::Ipv4Addr,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Output Errors ===
    /// Failed to open or append to an ADIF file.
    #[error("error saving ADIF file {path}: {source}")]
    OutputWrite {
        /// Path of the ADIF file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for n1mm2adif operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error came from a malformed inbound payload.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Check if this error came from writing an ADIF file.
    #[must_use]
    pub fn is_output_error(&self) -> bool {
        matches!(
            self,
            Self::OutputWrite { .. } | Self::DirectoryCreate { .. }
        )
    }
}
