use std::path::PathBuf;

use rand::Rng;
use tracing::info;
use wordvec_core::{resolve_vocabulary, EmbeddingMatrix, TokenMatrix, VectorSource, Vocabulary};
use wordvec_error::Result;

use crate::cache::ModelCache;
use crate::model::TrainedModel;
use crate::trainer::{EmbeddingTrainer, SkipGramTrainer, TrainingParams};

/// Loads a cached model for the requested parameters, or trains and caches one.
#[derive(Debug, Clone)]
pub struct TrainingLoader<T = SkipGramTrainer> {
    cache: ModelCache,
    trainer: T,
}

impl TrainingLoader<SkipGramTrainer> {
    /// Loader backed by the bundled skip-gram trainer.
    pub fn with_default_trainer(cache: ModelCache) -> Self {
        Self::new(cache, SkipGramTrainer)
    }
}

impl<T: EmbeddingTrainer> TrainingLoader<T> {
    pub fn new(cache: ModelCache, trainer: T) -> Self {
        Self { cache, trainer }
    }

    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    /// Return the model stored under `params.key()`, training it from `corpus` first when the
    /// cache has no entry. A cached model is returned as-is even if `corpus` changed since.
    pub fn load_or_train(
        &self,
        corpus: &TokenMatrix,
        vocabulary: &Vocabulary,
        params: &TrainingParams,
    ) -> Result<TrainedModel> {
        let key = params.key();
        if self.cache.contains(&key) {
            info!("Loading existing Word2Vec model '{key}'");
            return self.cache.load(&key);
        }

        params.validate()?;
        let sentences = corpus.decode(vocabulary)?;
        info!("Training Word2Vec model...");
        let mut model = self.trainer.train(&sentences, params)?;
        if params.finalize {
            model.finalize();
        }

        info!("Saving Word2Vec model '{key}'");
        self.cache.store(&key, &model)?;
        Ok(model)
    }

    /// Build the embedding matrix for `vocabulary` from the (possibly freshly trained) model.
    pub fn resolve<R: Rng>(
        &self,
        corpus: &TokenMatrix,
        vocabulary: &Vocabulary,
        params: &TrainingParams,
        rng: &mut R,
    ) -> Result<EmbeddingMatrix> {
        let model = self.load_or_train(corpus, vocabulary, params)?;
        resolve_vocabulary(&model, vocabulary, model.dims(), rng)
    }
}

/// Train or load with [`SkipGramTrainer`], caching under `model_dir`.
pub fn resolve_training_embeddings(
    corpus: &TokenMatrix,
    vocabulary: &Vocabulary,
    params: &TrainingParams,
    model_dir: impl Into<PathBuf>,
) -> Result<EmbeddingMatrix> {
    let loader = TrainingLoader::with_default_trainer(ModelCache::new(model_dir));
    loader.resolve(corpus, vocabulary, params, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    struct FixedTrainer;

    impl EmbeddingTrainer for FixedTrainer {
        fn train(&self, sentences: &[Vec<String>], params: &TrainingParams) -> Result<TrainedModel> {
            let mut words: Vec<String> = sentences.iter().flatten().cloned().collect();
            words.sort();
            words.dedup();
            let vectors = (0..words.len() * params.dims).map(|i| i as f32 + 1.0).collect();
            TrainedModel::new(params.dims, words, vectors)
        }
    }

    fn fixtures() -> (Vocabulary, TokenMatrix) {
        let vocab = Vocabulary::new(["<pad>", "the", "cat", "sat"]).unwrap();
        let corpus = TokenMatrix::new(vec![vec![1, 2, 3], vec![2, 3, 0]]);
        (vocab, corpus)
    }

    #[test]
    fn fresh_model_is_finalized_and_cached() {
        let tmp = tempdir().unwrap();
        let loader = TrainingLoader::new(ModelCache::new(tmp.path()), FixedTrainer);
        let (vocab, corpus) = fixtures();
        let params = TrainingParams::new(3, 1, 2);

        let model = loader.load_or_train(&corpus, &vocab, &params).unwrap();
        assert!(model.is_finalized());
        assert!(loader.cache().contains(&params.key()));
        for word in vocab.iter() {
            let v = model.vector_of(word).unwrap();
            let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5, "{word}: {norm}");
        }
    }

    #[test]
    fn finalize_can_be_disabled() {
        let tmp = tempdir().unwrap();
        let loader = TrainingLoader::new(ModelCache::new(tmp.path()), FixedTrainer);
        let (vocab, corpus) = fixtures();
        let params = TrainingParams {
            finalize: false,
            ..TrainingParams::new(2, 1, 2)
        };
        let model = loader.load_or_train(&corpus, &vocab, &params).unwrap();
        assert!(!model.is_finalized());
    }

    #[test]
    fn resolve_uses_model_dims() {
        let tmp = tempdir().unwrap();
        let loader = TrainingLoader::new(ModelCache::new(tmp.path()), FixedTrainer);
        let (vocab, corpus) = fixtures();
        let mut rng = StdRng::seed_from_u64(3);
        let matrix = loader
            .resolve(&corpus, &vocab, &TrainingParams::new(4, 1, 2), &mut rng)
            .unwrap();
        assert_eq!(matrix.shape(), (4, 4));
        assert_eq!(matrix.stats().found, 4);
    }
}
