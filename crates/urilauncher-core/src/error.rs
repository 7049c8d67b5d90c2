use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Registration requires administrator privileges")]
    InsufficientPrivileges,

    #[error("Failed to write registry key '{path}': {message}")]
    RegistryWrite { path: String, message: String },

    #[error("URI scheme registration is not supported on {0}")]
    UnsupportedPlatform(String),

    #[error("Unknown launcher URI: {0}")]
    UnmatchedUri(String),

    #[error("Failed to launch '{target}': {message}")]
    LaunchFailed { target: String, message: String },

    #[error("Failed to resolve path: {0}")]
    PathResolution(String),

    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a registry failure at `path`.
    pub fn registry(path: impl Into<String>, message: impl ToString) -> Self {
        Error::RegistryWrite {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
