use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use tracing::debug;
use wordvec_error::{PreconditionError, Result};

use crate::{EmbeddingMatrix, VectorSource, Vocabulary};

/// Inclusive lower bound of generated vector components.
pub const FALLBACK_LOW: f32 = -0.25;
/// Exclusive upper bound of generated vector components.
pub const FALLBACK_HIGH: f32 = 0.25;

/// Draw `dims` independent samples from `[FALLBACK_LOW, FALLBACK_HIGH)`.
pub fn fallback_vector<R: Rng>(dims: usize, rng: &mut R) -> Vec<f32> {
    let dist = Uniform::new(FALLBACK_LOW, FALLBACK_HIGH);
    (0..dims).map(|_| dist.sample(rng)).collect()
}

/// Build the embedding matrix for `vocabulary`, one row per word in vocabulary order.
///
/// Words known to `source` get their vector unchanged. Unknown words get a fresh
/// [`fallback_vector`]; nothing is cached, so repeated calls only agree on unknown words when
/// `rng` is seeded identically.
pub fn resolve_vocabulary<S, R>(
    source: &S,
    vocabulary: &Vocabulary,
    dims: usize,
    rng: &mut R,
) -> Result<EmbeddingMatrix>
where
    S: VectorSource + ?Sized,
    R: Rng,
{
    let mut matrix = EmbeddingMatrix::with_capacity(vocabulary.len(), dims);
    for word in vocabulary.iter() {
        match source.vector_of(word) {
            Some(vector) => {
                if vector.len() != dims {
                    return Err(PreconditionError::DimensionMismatch {
                        expected: dims,
                        actual: vector.len(),
                    }
                    .into());
                }
                matrix.push_found(&vector);
            }
            None => matrix.push_generated(fallback_vector(dims, rng)),
        }
    }
    let stats = matrix.stats();
    debug!(
        rows = matrix.rows(),
        dims,
        found = stats.found,
        generated = stats.generated,
        "resolved vocabulary against vector source"
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WordVectors;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wordvec_error::Error;

    fn pets() -> WordVectors {
        let mut m = WordVectors::new(2);
        m.insert_first("cat", vec![0.1, 0.2]).unwrap();
        m.insert_first("dog", vec![0.3, 0.4]).unwrap();
        m
    }

    fn in_fallback_range(row: &[f32]) -> bool {
        row.iter().all(|&x| (FALLBACK_LOW..FALLBACK_HIGH).contains(&x))
    }

    #[test]
    fn known_words_copied_unknown_words_generated() {
        let vocab = Vocabulary::new(["cat", "dog", "xyzzy"]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let matrix = resolve_vocabulary(&pets(), &vocab, 2, &mut rng).unwrap();

        assert_eq!(matrix.shape(), (3, 2));
        assert_eq!(matrix.row(0), Some(&[0.1, 0.2][..]));
        assert_eq!(matrix.row(1), Some(&[0.3, 0.4][..]));
        let unknown = matrix.row(2).unwrap();
        assert_eq!(unknown.len(), 2);
        assert!(in_fallback_range(unknown));
        assert_eq!(matrix.stats().found, 2);
        assert_eq!(matrix.stats().generated, 1);
    }

    #[test]
    fn every_row_has_requested_dims() {
        let words: Vec<String> = (0..50).map(|i| format!("w{i}")).collect();
        let vocab = Vocabulary::new(words).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let matrix = resolve_vocabulary(&WordVectors::new(16), &vocab, 16, &mut rng).unwrap();

        assert_eq!(matrix.rows(), vocab.len());
        assert!(matrix.iter_rows().all(|r| r.len() == 16));
        assert!(matrix.iter_rows().all(in_fallback_range));
    }

    #[test]
    fn seeded_rng_reproduces_fallback_rows() {
        let vocab = Vocabulary::new(["cat", "unicorn"]).unwrap();
        let a = resolve_vocabulary(&pets(), &vocab, 2, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = resolve_vocabulary(&pets(), &vocab, 2, &mut StdRng::seed_from_u64(3)).unwrap();
        let c = resolve_vocabulary(&pets(), &vocab, 2, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.row(0), c.row(0));
        assert_ne!(a.row(1), c.row(1));
    }

    #[test]
    fn empty_vocabulary_gives_empty_matrix() {
        let vocab = Vocabulary::default();
        let matrix =
            resolve_vocabulary(&pets(), &vocab, 2, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(matrix.shape(), (0, 2));
        assert!(matrix.as_slice().is_empty());
    }

    #[test]
    fn source_dims_disagreeing_with_request_is_rejected() {
        let vocab = Vocabulary::new(["cat"]).unwrap();
        let err = resolve_vocabulary(&pets(), &vocab, 3, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Precondition(PreconditionError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn matrix_serializes_as_nested_rows() {
        let vocab = Vocabulary::new(["dog", "cat"]).unwrap();
        let matrix =
            resolve_vocabulary(&pets(), &vocab, 2, &mut StdRng::seed_from_u64(0)).unwrap();
        let json = serde_json::to_string(&matrix).unwrap();
        let rows: Vec<Vec<f32>> = serde_json::from_str(&json).unwrap();
        assert_eq!(rows, matrix.clone().into_rows());
        assert_eq!(rows, vec![vec![0.3, 0.4], vec![0.1, 0.2]]);
    }
}
