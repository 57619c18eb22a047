#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InternalError {
    #[error("Training failed: {0}")]
    Training(String),

    #[error("Unexpected state: {0}")]
    InvalidState(String),
}
