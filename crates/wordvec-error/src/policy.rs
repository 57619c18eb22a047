//! Policies for classifying and emitting errors.
//!
//! Library crates return [`crate::Result`] and never log failures themselves; the binary installs
//! an `ErrorPolicy` at its boundary to decide how errors are presented.
//!
//! Example
//! ```rust,ignore
//! use wordvec_error::{ErrorPolicy, Severity, Error};
//!
//! struct PrintPolicy;
//! impl ErrorPolicy for PrintPolicy {
//!     fn classify(&self, e: &Error) -> Severity { e.severity() }
//!     fn emit(&self, e: &Error) { eprintln!("[{:?}] {e}", self.classify(e)); }
//! }
//! ```
use super::{Error, Severity};

pub trait ErrorPolicy: Send + Sync {
    /// Classify the error's severity
    fn classify(&self, error: &Error) -> Severity;

    /// Emit the error according to the policy
    fn emit(&self, error: &Error);
}

/// Emits through `tracing`, at WARN for warnings and ERROR otherwise.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Default)]
pub struct TracingPolicy;

#[cfg(feature = "tracing")]
impl ErrorPolicy for TracingPolicy {
    fn classify(&self, error: &Error) -> Severity {
        error.severity()
    }

    fn emit(&self, error: &Error) {
        use tracing::{event, Level};

        match self.classify(error) {
            Severity::Warning => event!(Level::WARN, error = %error),
            Severity::Error => event!(Level::ERROR, error = %error),
            Severity::Fatal => event!(Level::ERROR, fatal = true, error = %error),
        }
    }
}
