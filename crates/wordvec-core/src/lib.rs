//! Core data types for turning word vectors into embedding-layer weights.
//!
//! A [`Vocabulary`] fixes the row order, a [`VectorSource`] answers lookups, and
//! [`resolve_vocabulary`] stacks the answers into an [`EmbeddingMatrix`], generating a small
//! random vector for every word the source does not know.
pub mod corpus;
pub mod matrix;
pub mod resolve;
pub mod source;
pub mod vocabulary;

pub use corpus::TokenMatrix;
pub use matrix::{EmbeddingMatrix, ResolutionStats};
pub use resolve::{fallback_vector, resolve_vocabulary, FALLBACK_HIGH, FALLBACK_LOW};
pub use source::{VectorSource, WordVectors};
pub use vocabulary::Vocabulary;
