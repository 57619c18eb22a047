use super::{ErrorPolicy, Result};

/// Extension trait for `Result` enabling policy-driven emission at subsystem boundaries,
/// leaving the result unchanged for the caller.
///
/// Example
/// ```rust,ignore
/// use wordvec_error::{Result, ResultExt, TracingPolicy};
///
/// fn run(policy: &TracingPolicy) -> Result<()> {
///     load_everything().emit_event(policy)
/// }
/// ```
pub trait ResultExt<T> {
    /// Emit the error using the provided policy and return the result unchanged
    fn emit_event(self, policy: &impl ErrorPolicy) -> Self;
}

impl<T> ResultExt<T> for Result<T> {
    fn emit_event(self, policy: &impl ErrorPolicy) -> Self {
        if let Err(ref e) = self {
            policy.emit(e);
        }
        self
    }
}
