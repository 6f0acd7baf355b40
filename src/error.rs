use std::path::PathBuf;
use thiserror::Error;

type Source = Box<dyn std::error::Error + Send + Sync>;

/// Failures while walking the corpus or writing generated modules
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Docs root does not exist: {0:?}")]
    MissingRoot(PathBuf),

    #[error("Docs root is not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Failed to list documents under {root:?}: {source}")]
    Discover {
        root: PathBuf,
        #[source]
        source: Source,
    },

    #[error("Failed to read document {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: Source,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: Source,
    },

    #[error("Invalid extraction pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl CorpusError {
    pub(crate) fn read(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        CorpusError::Read {
            path: path.into(),
            source: err.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        CorpusError::Write {
            path: path.into(),
            source: err.into(),
        }
    }
}
