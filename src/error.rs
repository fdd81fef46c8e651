//! Reduce task error types

use std::{
    error::Error,
    fmt::{Display, Formatter},
    io,
    path::PathBuf,
    result,
};

/// Result type alias for reduce task operations.
pub type Result<T> = result::Result<T, ReduceError>;

/// Every way a reduce task can fail.
///
/// All of them are fatal for the task. Nothing is retried in here; the
/// orchestrator decides whether to run the task again.
#[derive(Debug)]
pub enum ReduceError {
    /// An intermediate file could not be opened.
    OpenIntermediate { path: PathBuf, source: io::Error },
    /// Reading an intermediate file failed part way through.
    ReadIntermediate {
        path: PathBuf,
        record: usize,
        source: io::Error,
    },
    /// An intermediate file holds a malformed or truncated record.
    CorruptRecord {
        path: PathBuf,
        record: usize,
        source: serde_json::Error,
    },
    /// The output file could not be created.
    CreateOutput { path: PathBuf, source: io::Error },
    /// Writing or flushing the output file failed.
    WriteOutput { path: PathBuf, source: io::Error },
    /// The finished output could not be moved into place.
    CommitOutput { path: PathBuf, source: io::Error },
    /// The application rejected its auxiliary arguments.
    Arguments { source: anyhow::Error },
    /// The application reduce function failed for `key`.
    Reduce { key: String, source: anyhow::Error },
}

impl ReduceError {
    /// The file the failure is about, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ReduceError::OpenIntermediate { path, .. }
            | ReduceError::ReadIntermediate { path, .. }
            | ReduceError::CorruptRecord { path, .. }
            | ReduceError::CreateOutput { path, .. }
            | ReduceError::WriteOutput { path, .. }
            | ReduceError::CommitOutput { path, .. } => Some(path),
            ReduceError::Arguments { .. } | ReduceError::Reduce { .. } => None,
        }
    }
}

impl Display for ReduceError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            ReduceError::OpenIntermediate { path, source } => {
                write!(f, "cannot open intermediate file {}: {}", path.display(), source)
            }
            ReduceError::ReadIntermediate {
                path,
                record,
                source,
            } => write!(
                f,
                "read error in {} at record {}: {}",
                path.display(),
                record,
                source
            ),
            ReduceError::CorruptRecord {
                path,
                record,
                source,
            } => write!(
                f,
                "corrupt record {} in {}: {}",
                record,
                path.display(),
                source
            ),
            ReduceError::CreateOutput { path, source } => {
                write!(f, "cannot create output file {}: {}", path.display(), source)
            }
            ReduceError::WriteOutput { path, source } => {
                write!(f, "cannot write output file {}: {}", path.display(), source)
            }
            ReduceError::CommitOutput { path, source } => {
                write!(f, "cannot commit output file {}: {}", path.display(), source)
            }
            ReduceError::Arguments { source } => {
                write!(f, "invalid application arguments: {:#}", source)
            }
            ReduceError::Reduce { key, source } => {
                write!(f, "reduce function failed for key {:?}: {:#}", key, source)
            }
        }
    }
}

impl Error for ReduceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ReduceError::OpenIntermediate { source, .. }
            | ReduceError::ReadIntermediate { source, .. }
            | ReduceError::CreateOutput { source, .. }
            | ReduceError::WriteOutput { source, .. }
            | ReduceError::CommitOutput { source, .. } => Some(source),
            ReduceError::CorruptRecord { source, .. } => Some(source),
            ReduceError::Arguments { source } | ReduceError::Reduce { source, .. } => {
                Some(&**source)
            }
        }
    }
}
