use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Required resource {path:?} does not exist")]
    Missing { path: PathBuf },

    #[error("I/O failure on {path:?}: {operation}: {source}")]
    FileOperation {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode {path:?}: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("Malformed line {line} in {path:?}: {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl ResourceError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ResourceError::Missing { path }
            | ResourceError::FileOperation { path, .. }
            | ResourceError::Corrupt { path, .. }
            | ResourceError::Malformed { path, .. } => path,
        }
    }

    /// Wrap an I/O failure with the file and the operation that hit it.
    pub fn io(operation: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        ResourceError::FileOperation {
            operation,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wrap a decoder failure (serde, vector-format readers) for `path`.
    pub fn corrupt(path: impl AsRef<Path>, err: impl std::fmt::Display) -> Self {
        ResourceError::Corrupt {
            path: path.as_ref().to_path_buf(),
            message: err.to_string(),
        }
    }
}
