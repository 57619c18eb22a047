use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use finalfusion::compat::word2vec::ReadWord2VecRaw;
use finalfusion::embeddings::Embeddings;
use finalfusion::storage::NdArray;
use finalfusion::vocab::{SimpleVocab, Vocab};
use flate2::read::GzDecoder;
use wordvec_core::VectorSource;
use wordvec_error::{ResourceError, Result};

type W2vEmbeddings = Embeddings<SimpleVocab, NdArray>;

/// Vectors read from the binary word2vec format.
///
/// Rows are read raw, without normalization, so lookups return the vectors exactly as stored
/// in the file.
pub struct Word2VecVectors {
    embeddings: W2vEmbeddings,
}

impl std::fmt::Debug for Word2VecVectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Word2VecVectors")
            .field("words", &self.embeddings.vocab().words_len())
            .field("dims", &self.embeddings.dims())
            .finish()
    }
}

/// Read a binary word2vec file, transparently gunzipping `*.gz` paths.
pub fn load_word2vec_binary(path: &Path) -> Result<Word2VecVectors> {
    let file = File::open(path).map_err(|e| ResourceError::io("open word2vec", path, e))?;
    let gzipped = path.extension().is_some_and(|ext| ext == "gz");
    let embeddings = if gzipped {
        let mut reader = BufReader::new(GzDecoder::new(file));
        W2vEmbeddings::read_word2vec_binary_raw(&mut reader, false)
    } else {
        let mut reader = BufReader::new(file);
        W2vEmbeddings::read_word2vec_binary_raw(&mut reader, false)
    }
    .map_err(|e| ResourceError::corrupt(path, e))?;
    Ok(Word2VecVectors { embeddings })
}

impl VectorSource for Word2VecVectors {
    fn dims(&self) -> usize {
        self.embeddings.dims()
    }

    fn len(&self) -> usize {
        self.embeddings.vocab().words_len()
    }

    fn contains(&self, word: &str) -> bool {
        self.embeddings.vocab().idx(word).is_some()
    }

    fn vector_of(&self, word: &str) -> Option<Cow<'_, [f32]>> {
        self.embeddings
            .embedding(word)
            .map(|e| Cow::Owned(e.to_vec()))
    }
}
