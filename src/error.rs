use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures from the persistence store and catalog file wrappers.
///
/// These never propagate into the session core; callers log them and fall
/// back to defaults, preserving the current visible state.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed data in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
