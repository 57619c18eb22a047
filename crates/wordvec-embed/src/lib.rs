//! wordvec-embed: produce embedding-layer weights from word vectors.
//!
//! Two entry points share one final step:
//! - [`training`]: load a cached model keyed by (dims, min_count, window), or train one through an
//!   [`EmbeddingTrainer`] and cache it.
//! - [`pretrained`]: load a fixed GoogleNews binary file or GloVe text file.
//!
//! Both finish with [`wordvec_core::resolve_vocabulary`], which fills unknown words with small
//! random vectors.
//!
//! Quick start:
//! ```no_run
//! use wordvec_core::{TokenMatrix, Vocabulary};
//! use wordvec_embed::{resolve_training_embeddings, TrainingParams};
//! # fn run() -> wordvec_error::Result<()> {
//! let vocab = Vocabulary::new(["<pad>", "the", "cat", "sat"])?;
//! let corpus = TokenMatrix::new(vec![vec![1, 2, 3], vec![2, 3, 0]]);
//! let weights = resolve_training_embeddings(&corpus, &vocab, &TrainingParams::default(), "word2vec_models")?;
//! assert_eq!(weights.rows(), vocab.len());
//! # Ok(()) }
//! ```
pub mod cache;
pub mod config;
pub mod model;
pub mod pretrained;
pub mod trainer;
pub mod training;
pub mod util;

pub use cache::{ModelCache, ModelKey};
pub use config::{EmbedConfig, PretrainedConfig};
pub use model::TrainedModel;
pub use pretrained::{
    resolve_pretrained_embeddings, PretrainedFormat, PretrainedLoader, PretrainedVectors,
};
pub use trainer::{EmbeddingTrainer, SkipGramTrainer, TrainingParams};
pub use training::{resolve_training_embeddings, TrainingLoader};
pub use util::init_tracing_once;

/// Directory that holds trained artifacts and pretrained resources unless configured otherwise.
pub const DEFAULT_MODEL_DIR: &str = "word2vec_models";
