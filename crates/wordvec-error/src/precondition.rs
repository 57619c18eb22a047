use std::path::PathBuf;

/// Violations of what an operation requires of its inputs or of the files it reads.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreconditionError {
    #[error("{format} vectors require dimensionality {expected}, got {actual}")]
    UnsupportedDimension {
        format: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown pretrain model type: {0}!")]
    UnknownModelType(String),

    #[error("Vector for '{word}' on line {line} has {actual} components, expected {expected}")]
    VectorLength {
        word: String,
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Expected {expected} distinct words in {path:?}, parsed {actual}")]
    EntryCount {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Duplicate vocabulary word '{word}' at indices {first} and {second}")]
    DuplicateWord {
        word: String,
        first: usize,
        second: usize,
    },

    #[error("Vocabulary index map has no word for index {missing} (size {len})")]
    SparseVocabulary { missing: usize, len: usize },

    #[error("Token index {index} at sentence {sentence}, position {position} is outside the vocabulary (size {vocab_len})")]
    TokenOutOfRange {
        sentence: usize,
        position: usize,
        index: u32,
        vocab_len: usize,
    },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}
