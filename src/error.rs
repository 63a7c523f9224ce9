use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File system operation that produced an I/O error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Open,
    Create,
    Read,
    Write,
    Remove,
    Rename,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            IoOp::Open => "open",
            IoOp::Create => "create",
            IoOp::Read => "read",
            IoOp::Write => "write",
            IoOp::Remove => "remove",
            IoOp::Rename => "rename",
        };
        f.write_str(verb)
    }
}

/// Coarse category of a [`ReplaceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad invocation, detected before anything on disk is touched
    Usage,
    /// Malformed glob syntax
    Pattern,
    /// Any failure reported by the file system
    Io,
}

/// Malformed glob pattern, with the position the parser gave up at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error in pattern `{pattern}` at position {pos}: {message}")]
pub struct PatternSyntaxError {
    pub pattern: String,
    pub pos: usize,
    pub message: &'static str,
}

/// Main error type for resub
#[derive(Error, Debug)]
pub enum ReplaceError {
    #[error("Invalid amount of arguments: expected {expected}, got {actual}")]
    InvalidArgs { expected: usize, actual: usize },

    #[error("Invalid source arg: the source directory must not be empty")]
    InvalidSource,

    #[error("Invalid glob arg: the glob pattern must not be empty")]
    InvalidGlob,

    #[error(transparent)]
    Pattern(#[from] PatternSyntaxError),

    #[error("Failed to {op} {}: {source}", path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("{}", read_aborted_message(path, temp, source, cleanup.as_ref()))]
    ReadAborted {
        path: PathBuf,
        temp: PathBuf,
        source: io::Error,
        cleanup: Option<io::Error>,
    },
}

fn read_aborted_message(
    path: &Path,
    temp: &Path,
    source: &io::Error,
    cleanup: Option<&io::Error>,
) -> String {
    match cleanup {
        None => format!(
            "Failed to read {}: {} (removed {})",
            path.display(),
            source,
            temp.display()
        ),
        Some(cleanup) => format!(
            "Failed to read {}: {} (also failed to remove {}: {})",
            path.display(),
            source,
            temp.display(),
            cleanup
        ),
    }
}

impl ReplaceError {
    /// Create a new IO error with path context
    pub fn io(op: IoOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Create an error for a walk step that could not enumerate or stat an entry
    pub fn walk(fallback: &Path, source: walkdir::Error) -> Self {
        let path = source
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| fallback.to_path_buf());
        Self::Walk { path, source }
    }

    /// Create a read failure that also records how removing the temp file went
    pub fn read_aborted(
        path: impl Into<PathBuf>,
        temp: impl Into<PathBuf>,
        source: io::Error,
        cleanup: Option<io::Error>,
    ) -> Self {
        Self::ReadAborted {
            path: path.into(),
            temp: temp.into(),
            source,
            cleanup,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgs { .. } | Self::InvalidSource | Self::InvalidGlob => ErrorKind::Usage,
            Self::Pattern(_) => ErrorKind::Pattern,
            Self::Io { .. } | Self::Walk { .. } | Self::ReadAborted { .. } => ErrorKind::Io,
        }
    }

    /// The path the failure is about, when there is one
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } | Self::Walk { path, .. } | Self::ReadAborted { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }
}

/// Result type alias using ReplaceError
pub type Result<T> = std::result::Result<T, ReplaceError>;
