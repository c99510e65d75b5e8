use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a dispatched action. These are logged by the worker and
/// never cross back to the interface thread.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("required path '{0}' is not configured or does not exist")]
    MissingPath(String),

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error deleting {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
