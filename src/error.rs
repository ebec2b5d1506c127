use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while importing a winners tree.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The winners directory given on the command line does not exist
    #[error("can't find IOCCC winners directory {}", .0.display())]
    MissingSourceDir(PathBuf),

    /// The output database already exists and overwriting was not requested
    #[error("file {} already exists! Use --force to override it", .0.display())]
    OutputExists(PathBuf),

    /// A non-comment line of the spoilers file is not `YYYY author text`
    #[error("malformed spoiler line {line_no} in {}: {line:?}", path.display())]
    MalformedSpoiler {
        path: PathBuf,
        line_no: usize,
        line: String,
    },

    /// A directory holding candidate sources has no 4-digit year segment
    #[error("can't derive the contest year from {}", .0.display())]
    UnparseablePath(PathBuf),

    /// Hint bytes are not valid in the requested text encoding
    #[error("hint {} is not valid {encoding}", path.display())]
    HintDecode {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl ImportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
