//! Fixed pretrained resources: the GoogleNews binary vectors and the GloVe text files.
mod glove;
mod word2vec;

pub use glove::{load_glove, read_glove};
pub use word2vec::{load_word2vec_binary, Word2VecVectors};

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use wordvec_core::{resolve_vocabulary, EmbeddingMatrix, VectorSource, Vocabulary, WordVectors};
use wordvec_error::{PreconditionError, ResourceError, Result};

use crate::config::PretrainedConfig;

/// The only dimensionality the GoogleNews vectors come in.
pub const GOOGLE_NEWS_DIMS: usize = 300;

/// Which pretrained resource to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PretrainedFormat {
    GoogleNews,
    Glove,
}

impl PretrainedFormat {
    /// The tag this format is selected by, e.g. on the command line.
    pub fn tag(self) -> &'static str {
        match self {
            PretrainedFormat::GoogleNews => "GoogleNews",
            PretrainedFormat::Glove => "glove",
        }
    }

    /// Fails when the format cannot provide `dims`-dimensional vectors.
    pub fn check_dims(self, dims: usize) -> Result<()> {
        match self {
            PretrainedFormat::GoogleNews if dims != GOOGLE_NEWS_DIMS => {
                Err(PreconditionError::UnsupportedDimension {
                    format: self.tag(),
                    expected: GOOGLE_NEWS_DIMS,
                    actual: dims,
                }
                .into())
            }
            _ => Ok(()),
        }
    }

    /// File name of the resource inside the model directory.
    pub fn resource_file(self, config: &PretrainedConfig, dims: usize) -> String {
        match self {
            PretrainedFormat::GoogleNews => config.google_news_file.clone(),
            PretrainedFormat::Glove => config.glove_file(dims),
        }
    }
}

impl fmt::Display for PretrainedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PretrainedFormat {
    type Err = PreconditionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "GoogleNews" => Ok(PretrainedFormat::GoogleNews),
            "glove" => Ok(PretrainedFormat::Glove),
            other => Err(PreconditionError::UnknownModelType(other.to_string())),
        }
    }
}

/// Vectors loaded from one of the pretrained resources.
#[derive(Debug)]
pub enum PretrainedVectors {
    Word2Vec(Word2VecVectors),
    Glove(WordVectors),
}

impl VectorSource for PretrainedVectors {
    fn dims(&self) -> usize {
        match self {
            PretrainedVectors::Word2Vec(v) => v.dims(),
            PretrainedVectors::Glove(v) => v.dims(),
        }
    }

    fn len(&self) -> usize {
        match self {
            PretrainedVectors::Word2Vec(v) => v.len(),
            PretrainedVectors::Glove(v) => v.len(),
        }
    }

    fn contains(&self, word: &str) -> bool {
        match self {
            PretrainedVectors::Word2Vec(v) => v.contains(word),
            PretrainedVectors::Glove(v) => v.contains(word),
        }
    }

    fn vector_of(&self, word: &str) -> Option<Cow<'_, [f32]>> {
        match self {
            PretrainedVectors::Word2Vec(v) => v.vector_of(word),
            PretrainedVectors::Glove(v) => v.vector_of(word),
        }
    }
}

/// Reads pretrained resources from a model directory.
#[derive(Debug, Clone, PartialEq)]
pub struct PretrainedLoader {
    model_dir: PathBuf,
    config: PretrainedConfig,
}

impl PretrainedLoader {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self::from_config(model_dir, PretrainedConfig::default())
    }

    pub fn from_config(model_dir: impl Into<PathBuf>, config: PretrainedConfig) -> Self {
        Self {
            model_dir: model_dir.into(),
            config,
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    pub fn resource_path(&self, format: PretrainedFormat, dims: usize) -> PathBuf {
        self.model_dir.join(format.resource_file(&self.config, dims))
    }

    /// Load the resource for `format` at `dims`. The dimensionality is validated before the
    /// filesystem is touched.
    pub fn load(&self, format: PretrainedFormat, dims: usize) -> Result<PretrainedVectors> {
        format.check_dims(dims)?;
        let path = self.resource_path(format, dims);
        if !path.is_file() {
            return Err(ResourceError::Missing { path }.into());
        }
        match format {
            PretrainedFormat::GoogleNews => {
                info!("Loading existing Word2Vec model (GoogleNews-{dims})");
                let vectors = load_word2vec_binary(&path)?;
                if vectors.dims() != dims {
                    return Err(ResourceError::corrupt(
                        &path,
                        format!("file holds {}-dimensional vectors", vectors.dims()),
                    )
                    .into());
                }
                Ok(PretrainedVectors::Word2Vec(vectors))
            }
            PretrainedFormat::Glove => {
                info!("Loading existing Word2Vec model (Glove.6B.{dims}d)");
                let vectors = load_glove(&path, dims, self.config.glove_expected_entries)?;
                Ok(PretrainedVectors::Glove(vectors))
            }
        }
    }

    /// Load the resource and build the embedding matrix for `vocabulary`.
    pub fn resolve<R: Rng>(
        &self,
        format: PretrainedFormat,
        vocabulary: &Vocabulary,
        dims: usize,
        rng: &mut R,
    ) -> Result<EmbeddingMatrix> {
        let vectors = self.load(format, dims)?;
        resolve_vocabulary(&vectors, vocabulary, dims, rng)
    }
}

/// Parse `model_type`, load the matching resource from `model_dir` and resolve `vocabulary`
/// against it with an entropy-seeded generator.
pub fn resolve_pretrained_embeddings(
    model_type: &str,
    vocabulary: &Vocabulary,
    dims: usize,
    model_dir: impl Into<PathBuf>,
) -> Result<EmbeddingMatrix> {
    let format: PretrainedFormat = model_type.parse()?;
    let mut rng = StdRng::from_entropy();
    PretrainedLoader::new(model_dir).resolve(format, vocabulary, dims, &mut rng)
}
