use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use wordvec_core::VectorSource;
use wordvec_error::{InternalError, Result};

/// Word vectors produced by an [`crate::EmbeddingTrainer`].
///
/// Finalizing normalizes every vector to unit length and cannot be undone; the model is then
/// only good for lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredModel", into = "StoredModel")]
pub struct TrainedModel {
    dims: usize,
    words: Vec<String>,
    vectors: Vec<f32>,
    finalized: bool,
    index: HashMap<String, usize>,
}

/// On-disk layout; the word index is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct StoredModel {
    dims: usize,
    words: Vec<String>,
    vectors: Vec<f32>,
    #[serde(default)]
    finalized: bool,
}

impl TrainedModel {
    /// `vectors` is row-major, one row of `dims` values per word.
    pub fn new(dims: usize, words: Vec<String>, vectors: Vec<f32>) -> Result<Self> {
        if dims == 0 {
            return Err(InternalError::InvalidState("model dimensionality is zero".into()).into());
        }
        if vectors.len() != words.len() * dims {
            return Err(InternalError::InvalidState(format!(
                "{} words x {} dims needs {} values, got {}",
                words.len(),
                dims,
                words.len() * dims,
                vectors.len()
            ))
            .into());
        }
        let mut index = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if index.insert(word.clone(), i).is_some() {
                return Err(
                    InternalError::InvalidState(format!("word '{word}' appears twice")).into(),
                );
            }
        }
        Ok(Self {
            dims,
            words,
            vectors,
            finalized: false,
            index,
        })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn row(&self, idx: usize) -> Option<&[f32]> {
        let start = idx.checked_mul(self.dims)?;
        self.vectors.get(start..start + self.dims)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// L2-normalize every vector in place. Zero vectors stay zero. Idempotent.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        for row in self.vectors.chunks_mut(self.dims) {
            let norm = row.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                row.iter_mut().for_each(|x| *x /= norm);
            }
        }
        self.finalized = true;
    }
}

impl VectorSource for TrainedModel {
    fn dims(&self) -> usize {
        self.dims
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    fn vector_of(&self, word: &str) -> Option<Cow<'_, [f32]>> {
        self.index
            .get(word)
            .and_then(|&i| self.row(i))
            .map(Cow::Borrowed)
    }
}

impl TryFrom<StoredModel> for TrainedModel {
    type Error = String;

    fn try_from(stored: StoredModel) -> std::result::Result<Self, Self::Error> {
        let mut model =
            TrainedModel::new(stored.dims, stored.words, stored.vectors).map_err(|e| e.to_string())?;
        model.finalized = stored.finalized;
        Ok(model)
    }
}

impl From<TrainedModel> for StoredModel {
    fn from(model: TrainedModel) -> Self {
        StoredModel {
            dims: model.dims,
            words: model.words,
            vectors: model.vectors,
            finalized: model.finalized,
        }
    }
}
