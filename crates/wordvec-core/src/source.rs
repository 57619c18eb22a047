use std::borrow::Cow;
use std::collections::HashMap;

use wordvec_error::{PreconditionError, Result};

/// Anything that can answer "do you know this word, and what is its vector".
///
/// Trained models, parsed text files and binary vector files all implement this, so the final
/// vocabulary resolution step does not care where vectors came from.
pub trait VectorSource {
    /// Length of every vector this source returns.
    fn dims(&self) -> usize;

    /// Number of distinct words known to the source.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, word: &str) -> bool;

    fn vector_of(&self, word: &str) -> Option<Cow<'_, [f32]>>;
}

impl<S: VectorSource + ?Sized> VectorSource for Box<S> {
    fn dims(&self) -> usize {
        (**self).dims()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn contains(&self, word: &str) -> bool {
        (**self).contains(word)
    }

    fn vector_of(&self, word: &str) -> Option<Cow<'_, [f32]>> {
        (**self).vector_of(word)
    }
}

/// Plain word -> vector mapping with a fixed dimensionality.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WordVectors {
    dims: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl WordVectors {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            vectors: HashMap::new(),
        }
    }

    pub fn with_capacity(dims: usize, capacity: usize) -> Self {
        Self {
            dims,
            vectors: HashMap::with_capacity(capacity),
        }
    }

    /// Insert `vector` for `word` unless the word is already present; the first occurrence
    /// wins. Returns whether the vector was stored.
    pub fn insert_first(&mut self, word: impl Into<String>, vector: Vec<f32>) -> Result<bool> {
        if vector.len() != self.dims {
            return Err(PreconditionError::DimensionMismatch {
                expected: self.dims,
                actual: vector.len(),
            }
            .into());
        }
        let word = word.into();
        if self.vectors.contains_key(&word) {
            return Ok(false);
        }
        self.vectors.insert(word, vector);
        Ok(true)
    }

    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.vectors.get(word).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> + '_ {
        self.vectors
            .iter()
            .map(|(w, v)| (w.as_str(), v.as_slice()))
    }
}

impl VectorSource for WordVectors {
    fn dims(&self) -> usize {
        self.dims
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn contains(&self, word: &str) -> bool {
        self.vectors.contains_key(word)
    }

    fn vector_of(&self, word: &str) -> Option<Cow<'_, [f32]>> {
        self.get(word).map(Cow::Borrowed)
    }
}
