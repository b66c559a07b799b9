use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Errors that can occur during pantsbridge operations
///
/// The enum is `Clone` so a single failure can be observed by every waiter
/// of a shared future (cached target listings, the in-flight amend).
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("Malformed address: '{spec}'")]
    MalformedAddress { spec: String },

    #[error("No such folder for '{spec}': {}", .path.display())]
    UnknownDirectory { spec: String, path: PathBuf },

    #[error("No such target: '{spec}'")]
    UnknownTarget { spec: String },

    #[error("`{command}` failed ({}): {stderr}", exit_code_display(.code))]
    ExternalProcessFailure {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("An amend is already in progress")]
    AmendAlreadyInProgress,

    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("Not a Pants project: {}", .0.display())]
    NotAPantsProject(PathBuf),

    #[error("IO error: {0}")]
    IoError(Arc<io::Error>),

    #[error("Serialization error: {0}")]
    SerializationError(Arc<serde_json::Error>),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// `AmendAlreadyInProgress` is a rejection, not a fault. Callers retry
    /// silently instead of reporting it.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::AmendAlreadyInProgress)
    }

    /// Captured standard error of a failed external command
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Error::ExternalProcessFailure { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IoError(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(Arc::new(err))
    }
}

fn exit_code_display(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Result type alias for pantsbridge operations
pub type Result<T> = std::result::Result<T, Error>;
