use std::io;

/// Custom error type for deploy_hook operations
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to bind listener on {address}: {source}")]
    BindFailed { address: String, source: io::Error },

    #[error("Could not parse webhook payload: {0}")]
    PayloadParse(String),

    #[error("Command '{command}' failed to start: {source}")]
    CommandSpawnFailed { command: String, source: io::Error },

    #[error("Command '{command}' failed with exit code {code:?}")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Command '{command}' timed out after {secs}s")]
    CommandTimedOut { command: String, secs: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

/// Helper type for Results that use DeployError
pub type Result<T> = std::result::Result<T, DeployError>;
