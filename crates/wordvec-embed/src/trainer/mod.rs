//! The seam between this crate and whatever actually learns word vectors.
mod skipgram;

pub use skipgram::SkipGramTrainer;

use wordvec_error::{PreconditionError, Result};

use crate::cache::ModelKey;
use crate::model::TrainedModel;

/// Learns word vectors from tokenized sentences.
///
/// Implementations own the algorithm entirely; callers only see the resulting
/// [`TrainedModel`].
pub trait EmbeddingTrainer {
    fn train(&self, sentences: &[Vec<String>], params: &TrainingParams) -> Result<TrainedModel>;
}

impl<T: EmbeddingTrainer + ?Sized> EmbeddingTrainer for &T {
    fn train(&self, sentences: &[Vec<String>], params: &TrainingParams) -> Result<TrainedModel> {
        (**self).train(sentences, params)
    }
}

impl<T: EmbeddingTrainer + ?Sized> EmbeddingTrainer for Box<T> {
    fn train(&self, sentences: &[Vec<String>], params: &TrainingParams) -> Result<TrainedModel> {
        (**self).train(sentences, params)
    }
}

/// Hyperparameters for training. Only `dims`, `min_count` and `window` take part in the
/// cache key; the rest only matter the first time a key is trained.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingParams {
    /// Word vector dimensionality.
    pub dims: usize,
    /// Words seen fewer times than this are ignored.
    pub min_count: usize,
    /// Maximum distance between a word and its context words.
    pub window: usize,
    /// Downsampling threshold for frequent words; 0 disables downsampling.
    pub sample: f64,
    /// Threads the trainer may use.
    pub workers: usize,
    /// Negative samples per positive pair.
    pub negative: usize,
    pub epochs: usize,
    /// Initial learning rate, decayed linearly to `min_alpha`.
    pub alpha: f32,
    pub min_alpha: f32,
    pub seed: u64,
    /// Normalize vectors once training is done; the model cannot be trained further.
    pub finalize: bool,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            dims: 300,
            min_count: 1,
            window: 10,
            sample: 1e-3,
            workers: 2,
            negative: 5,
            epochs: 5,
            alpha: 0.025,
            min_alpha: 1e-4,
            seed: 1,
            finalize: true,
        }
    }
}

impl TrainingParams {
    /// Defaults with the three cache-key parameters replaced.
    pub fn new(dims: usize, min_count: usize, window: usize) -> Self {
        Self {
            dims,
            min_count,
            window,
            ..Self::default()
        }
    }

    pub fn key(&self) -> ModelKey {
        ModelKey::new(self.dims, self.min_count, self.window)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("dims", self.dims),
            ("window", self.window),
            ("workers", self.workers),
            ("negative", self.negative),
            ("epochs", self.epochs),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(invalid(name, "must be greater than zero".into()));
            }
        }
        if !(self.sample >= 0.0 && self.sample.is_finite()) {
            return Err(invalid("sample", format!("{} is not a finite, non-negative rate", self.sample)));
        }
        if !(self.alpha > 0.0 && self.min_alpha >= 0.0 && self.min_alpha <= self.alpha) {
            return Err(invalid(
                "alpha",
                format!("need 0 <= min_alpha ({}) <= alpha ({}) and alpha > 0", self.min_alpha, self.alpha),
            ));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: String) -> wordvec_error::Error {
    PreconditionError::InvalidParameter { name, reason }.into()
}
