//! Error types shared by the wordvec crates.
//!
//! Every failure aborts the call that produced it; there are no partial results and no retries.
//! Errors are grouped the way callers need to react to them:
//! - [`PreconditionError`]: the caller asked for something the sources cannot satisfy
//!   (bad dimensionality, unknown model type, malformed counts).
//! - [`ResourceError`]: a file the operation depends on is missing, unreadable or corrupt.
//! - [`InternalError`]: the trainer or a model ended up in a state it cannot continue from.
//! - [`Error::Config`]: a configuration file could not be parsed.
pub mod internal;
pub mod policy;
pub mod precondition;
pub mod resource;
pub mod result_ext;
pub mod severity;

pub use internal::InternalError;
pub use policy::ErrorPolicy;
#[cfg(feature = "tracing")]
pub use policy::TracingPolicy;
pub use precondition::PreconditionError;
pub use resource::ResourceError;
pub use result_ext::ResultExt;
pub use severity::Severity;

use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Internal(#[from] InternalError),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Coarse classification used by [`ErrorPolicy`] implementations.
    pub fn severity(&self) -> Severity {
        match self {
            Error::Precondition(_) => Severity::Fatal,
            Error::Resource(ResourceError::Missing { .. }) => Severity::Fatal,
            Error::Resource(_) => Severity::Error,
            Error::Internal(_) => Severity::Error,
            Error::Config(_) => Severity::Fatal,
        }
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::Precondition(_))
    }

    /// The file this error concerns, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Error::Resource(r) => Some(r.path()),
            Error::Precondition(PreconditionError::EntryCount { path, .. }) => Some(path),
            _ => None,
        }
    }
}
