use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;
use wordvec_core::{VectorSource, Vocabulary, FALLBACK_HIGH, FALLBACK_LOW};
use wordvec_embed::{
    resolve_pretrained_embeddings, PretrainedConfig, PretrainedFormat, PretrainedLoader,
};
use wordvec_error::{Error, PreconditionError, ResourceError};
use wordvec_test_utils::{
    synthetic_entries, write_glove, write_word2vec_binary, write_word2vec_binary_gz,
};

fn small_glove_config(expected: Option<usize>) -> PretrainedConfig {
    PretrainedConfig {
        glove_expected_entries: expected,
        ..PretrainedConfig::default()
    }
}

fn bits(v: &[f32]) -> Vec<u32> {
    v.iter().map(|x| x.to_bits()).collect()
}

#[test]
fn glove_scenario_cat_dog_unknown() {
    let tmp = tempdir().unwrap();
    write_glove(
        &tmp.path().join("glove.6B.2d.txt"),
        &[("cat", vec![0.1, 0.2]), ("dog", vec![0.3, 0.4])],
    );
    let loader = PretrainedLoader::from_config(tmp.path(), small_glove_config(Some(2)));
    let vocab = Vocabulary::new(["cat", "dog", "xyzzy"]).unwrap();

    let matrix = loader
        .resolve(PretrainedFormat::Glove, &vocab, 2, &mut StdRng::seed_from_u64(5))
        .unwrap();
    assert_eq!(matrix.shape(), (3, 2));
    assert_eq!(matrix.row(0).unwrap(), &[0.1, 0.2]);
    assert_eq!(matrix.row(1).unwrap(), &[0.3, 0.4]);
    assert!(matrix
        .row(2)
        .unwrap()
        .iter()
        .all(|x| (FALLBACK_LOW..FALLBACK_HIGH).contains(x)));
    assert_eq!(matrix.stats().generated, 1);
}

#[test]
fn glove_default_expects_400k_entries() {
    let tmp = tempdir().unwrap();
    write_glove(&tmp.path().join("glove.6B.3d.txt"), &synthetic_entries(10, 3, 1));

    let err = PretrainedLoader::new(tmp.path())
        .load(PretrainedFormat::Glove, 3)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Precondition(PreconditionError::EntryCount {
            expected: 400_000,
            actual: 10,
            ..
        })
    ));
}

#[test]
fn glove_requested_dims_must_match_file() {
    let tmp = tempdir().unwrap();
    // A 50d request against a file whose vectors are 3d.
    write_glove(&tmp.path().join("glove.6B.50d.txt"), &synthetic_entries(4, 3, 1));

    let err = PretrainedLoader::from_config(tmp.path(), small_glove_config(None))
        .load(PretrainedFormat::Glove, 50)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Precondition(PreconditionError::VectorLength {
            line: 1,
            expected: 50,
            actual: 3,
            ..
        })
    ));
}

#[test]
fn google_news_rejects_other_dims_before_touching_disk() {
    let vocab = Vocabulary::new(["cat"]).unwrap();
    let err = resolve_pretrained_embeddings("GoogleNews", &vocab, 100, "/no/such/model/dir")
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Precondition(PreconditionError::UnsupportedDimension {
            expected: 300,
            actual: 100,
            ..
        })
    ));
}

#[test]
fn unknown_model_type_is_identifiable() {
    let vocab = Vocabulary::new(["cat"]).unwrap();
    let err = resolve_pretrained_embeddings("fasttext", &vocab, 300, "/no/such/model/dir")
        .unwrap_err();
    assert!(matches!(
        &err,
        Error::Precondition(PreconditionError::UnknownModelType(tag)) if tag == "fasttext"
    ));
    assert_eq!(err.to_string(), "Unknown pretrain model type: fasttext!");
}

#[test]
fn missing_google_news_file() {
    let tmp = tempdir().unwrap();
    let vocab = Vocabulary::new(["cat"]).unwrap();
    let err = resolve_pretrained_embeddings("GoogleNews", &vocab, 300, tmp.path()).unwrap_err();
    assert!(matches!(err, Error::Resource(ResourceError::Missing { .. })));
    assert_eq!(
        err.path().unwrap(),
        &tmp.path().join("GoogleNews-vectors-negative300.bin.gz")
    );
}

#[test]
fn google_news_binary_gz_is_read_unnormalized() {
    let tmp = tempdir().unwrap();
    let mut entries = synthetic_entries(5, 300, 9);
    entries[0].0 = "cat".to_string();
    write_word2vec_binary_gz(
        &tmp.path().join("GoogleNews-vectors-negative300.bin.gz"),
        &entries,
    );

    let loader = PretrainedLoader::new(tmp.path());
    let vectors = loader.load(PretrainedFormat::GoogleNews, 300).unwrap();
    assert_eq!(vectors.len(), 5);
    assert_eq!(vectors.dims(), 300);
    assert!(vectors.contains("cat"));
    assert_eq!(vectors.vector_of("cat").unwrap().as_ref(), entries[0].1.as_slice());

    let vocab = Vocabulary::new(["cat", "w3", "unknown"]).unwrap();
    let matrix = loader
        .resolve(PretrainedFormat::GoogleNews, &vocab, 300, &mut StdRng::seed_from_u64(1))
        .unwrap();
    assert_eq!(matrix.shape(), (3, 300));
    assert_eq!(matrix.row(1).unwrap(), entries[3].1.as_slice());
    assert_eq!(matrix.stats().found, 2);
}

#[test]
fn uncompressed_word2vec_binary_is_read() {
    let tmp = tempdir().unwrap();
    let entries = synthetic_entries(3, 300, 4);
    let config = PretrainedConfig {
        google_news_file: "vectors.bin".to_string(),
        ..PretrainedConfig::default()
    };
    write_word2vec_binary(&tmp.path().join("vectors.bin"), &entries);

    let vectors = PretrainedLoader::from_config(tmp.path(), config)
        .load(PretrainedFormat::GoogleNews, 300)
        .unwrap();
    assert_eq!(vectors.len(), 3);
    assert_eq!(vectors.vector_of("w2").unwrap().as_ref(), entries[2].1.as_slice());
}

#[test]
fn word2vec_rows_come_back_bit_for_bit() {
    let tmp = tempdir().unwrap();
    let entries = synthetic_entries(200, 300, 17);
    let config = PretrainedConfig {
        google_news_file: "vectors.bin".to_string(),
        ..PretrainedConfig::default()
    };
    write_word2vec_binary(&tmp.path().join("vectors.bin"), &entries);

    let vectors = PretrainedLoader::from_config(tmp.path(), config)
        .load(PretrainedFormat::GoogleNews, 300)
        .unwrap();
    for (word, expected) in &entries {
        let actual = vectors.vector_of(word).unwrap();
        assert_eq!(bits(&actual), bits(expected), "row for {word} changed on load");
    }
}
