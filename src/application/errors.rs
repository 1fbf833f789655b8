//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Storage(#[from] StorageError),
}

/// Errors from third-party REST APIs.
///
/// There is exactly one attempt per request; these are reported to the
/// user as-is.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Error: {0}")]
    Service(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("{0} not found")]
    NotFound(String),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Failures of the evaluation worker process itself, as opposed to
/// failures of the expression it was asked to evaluate.
#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("failed to start evaluation worker: {0}")]
    Spawn(std::io::Error),

    #[error("evaluation worker I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("evaluation worker exited with {0}")]
    Exited(std::process::ExitStatus),

    #[error("evaluation worker sent an unreadable reply: {0}")]
    Protocol(#[from] serde_json::Error),
}
