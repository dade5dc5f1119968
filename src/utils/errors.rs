use thiserror::Error;

/// Unified error type for the debug gateway and its node wiring.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("RPC server error: {0}")]
    RpcServerError(String),

    /// A message was forwarded to a processor that does not handle its type.
    #[error("Invalid message type forwarded for processing: expected {expected}, got {actual}")]
    InvalidMessageType { expected: String, actual: String },
}

/// Convenience alias
pub type Result<T> = std::result::Result<T, NodeError>;
