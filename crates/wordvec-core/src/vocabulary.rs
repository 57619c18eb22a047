use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use wordvec_error::{PreconditionError, Result};

/// Ordered list of distinct words. A word's position is the row it occupies in the
/// embedding matrix.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary from words in index order. Fails on the first duplicate.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Vocabulary::default();
        for word in words {
            let word = word.into();
            let next = vocab.words.len();
            if let Some(&first) = vocab.index.get(&word) {
                return Err(PreconditionError::DuplicateWord {
                    word,
                    first,
                    second: next,
                }
                .into());
            }
            vocab.index.insert(word.clone(), next);
            vocab.words.push(word);
        }
        Ok(vocab)
    }

    /// Build a vocabulary from an index -> word mapping. Indices must cover `0..len` exactly.
    pub fn from_index_map<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, String)>,
    {
        let sorted: BTreeMap<usize, String> = entries.into_iter().collect();
        let len = sorted.len();
        for (expected, idx) in sorted.keys().enumerate() {
            if *idx != expected {
                return Err(PreconditionError::SparseVocabulary {
                    missing: expected,
                    len,
                }
                .into());
            }
        }
        Self::new(sorted.into_values())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, idx: usize) -> Option<&str> {
        self.words.get(idx).map(String::as_str)
    }

    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = wordvec_error::Error;

    fn try_from(words: Vec<String>) -> Result<Self> {
        Self::new(words)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.words
    }
}
