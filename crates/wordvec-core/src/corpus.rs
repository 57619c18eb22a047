use wordvec_error::{PreconditionError, Result};

use crate::Vocabulary;

/// Sentences encoded as vocabulary indices: one row per sentence, one column per position.
///
/// Rows may differ in length; padded matrices simply carry the padding word's index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenMatrix {
    rows: Vec<Vec<u32>>,
}

impl TokenMatrix {
    pub fn new(rows: Vec<Vec<u32>>) -> Self {
        Self { rows }
    }

    /// Encode tokenized sentences against `vocabulary`. Tokens the vocabulary does not contain
    /// are dropped; the second element counts them.
    pub fn encode<S, T>(sentences: &[S], vocabulary: &Vocabulary) -> (Self, usize)
    where
        S: AsRef<[T]>,
        T: AsRef<str>,
    {
        let mut dropped = 0;
        let rows = sentences
            .iter()
            .map(|sentence| {
                sentence
                    .as_ref()
                    .iter()
                    .filter_map(|tok| {
                        let idx = vocabulary.index_of(tok.as_ref());
                        if idx.is_none() {
                            dropped += 1;
                        }
                        idx.map(|i| i as u32)
                    })
                    .collect::<Vec<u32>>()
            })
            .collect();
        (Self { rows }, dropped)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.rows
    }

    /// Map every index back to its literal word, sentence by sentence.
    pub fn decode(&self, vocabulary: &Vocabulary) -> Result<Vec<Vec<String>>> {
        let mut sentences = Vec::with_capacity(self.rows.len());
        for (sentence, row) in self.rows.iter().enumerate() {
            let mut words = Vec::with_capacity(row.len());
            for (position, &index) in row.iter().enumerate() {
                let word = vocabulary.word(index as usize).ok_or(
                    PreconditionError::TokenOutOfRange {
                        sentence,
                        position,
                        index,
                        vocab_len: vocabulary.len(),
                    },
                )?;
                words.push(word.to_owned());
            }
            sentences.push(words);
        }
        Ok(sentences)
    }
}

impl From<Vec<Vec<u32>>> for TokenMatrix {
    fn from(rows: Vec<Vec<u32>>) -> Self {
        Self::new(rows)
    }
}
