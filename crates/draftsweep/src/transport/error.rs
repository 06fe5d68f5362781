//! Mail transport error types.

use thiserror::Error;

/// Errors raised by a mail transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to the server.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// TLS/SSL error during connection.
    #[error("TLS error: {0}")]
    TlsError(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// No usable password source.
    #[error("Credentials not found: {0}")]
    CredentialsNotFound(String),

    /// Protocol-level failure reported by the server.
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Folder not found.
    #[error("Folder '{0}' not found")]
    FolderNotFound(String),

    /// A message could not be parsed.
    #[error("Failed to parse message: {0}")]
    ParseError(String),

    /// A reply draft could not be built or stored.
    #[error("Failed to create draft: {0}")]
    DraftFailed(String),

    /// Invalid transport configuration.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<async_native_tls::Error> for TransportError {
    fn from(err: async_native_tls::Error) -> Self {
        TransportError::TlsError(err.to_string())
    }
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
