//! Fixture writers shared by the wordvec test suites.
//!
//! Everything here panics on I/O failure; it is only meant to run inside tests.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wordvec_core::{TokenMatrix, Vocabulary};

/// Write `entries` as GloVe text: the word, then its components separated by single spaces.
pub fn write_glove<W: AsRef<str>>(path: &Path, entries: &[(W, Vec<f32>)]) {
    let mut out = BufWriter::new(File::create(path).expect("create glove fixture"));
    for (word, vector) in entries {
        write!(out, "{}", word.as_ref()).unwrap();
        for x in vector {
            write!(out, " {x}").unwrap();
        }
        writeln!(out).unwrap();
    }
    out.flush().unwrap();
}

/// Serialize `entries` in the binary word2vec layout: an ASCII `"{words} {dims}\n"` header,
/// then per word its text, a space, `dims` little-endian f32s and a newline.
pub fn word2vec_binary_bytes<W: AsRef<str>>(entries: &[(W, Vec<f32>)]) -> Vec<u8> {
    let dims = entries.first().map_or(0, |(_, v)| v.len());
    let mut buf = format!("{} {}\n", entries.len(), dims).into_bytes();
    for (word, vector) in entries {
        assert_eq!(vector.len(), dims, "ragged word2vec fixture");
        buf.extend_from_slice(word.as_ref().as_bytes());
        buf.push(b' ');
        for x in vector {
            buf.extend_from_slice(&x.to_le_bytes());
        }
        buf.push(b'\n');
    }
    buf
}

pub fn write_word2vec_binary<W: AsRef<str>>(path: &Path, entries: &[(W, Vec<f32>)]) {
    std::fs::write(path, word2vec_binary_bytes(entries)).expect("write word2vec fixture");
}

/// Same as [`write_word2vec_binary`], gzip-compressed.
pub fn write_word2vec_binary_gz<W: AsRef<str>>(path: &Path, entries: &[(W, Vec<f32>)]) {
    let file = File::create(path).expect("create gz fixture");
    let mut encoder = GzEncoder::new(file, Compression::fast());
    encoder
        .write_all(&word2vec_binary_bytes(entries))
        .expect("compress word2vec fixture");
    encoder.finish().expect("finish gz fixture");
}

/// `count` entries named `w0`, `w1`, ... with seeded random components in `[-1, 1)`.
pub fn synthetic_entries(count: usize, dims: usize, seed: u64) -> Vec<(String, Vec<f32>)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let v = (0..dims).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
            (format!("w{i}"), v)
        })
        .collect()
}

pub const TOY_WORDS: [&str; 8] = ["<pad>", "the", "cat", "sat", "on", "mat", "dog", "ran"];

pub fn toy_vocabulary() -> Vocabulary {
    Vocabulary::new(TOY_WORDS).expect("toy vocabulary has no duplicates")
}

/// A handful of short sentences over [`TOY_WORDS`], repeated so every word clears a
/// `min_count` of 3.
pub fn toy_corpus() -> TokenMatrix {
    let base = [
        vec![1, 2, 3, 4, 1, 5],
        vec![1, 6, 7, 4, 1, 5],
        vec![1, 2, 7, 0],
        vec![1, 6, 3, 0],
    ];
    TokenMatrix::new(base.iter().cycle().take(12).cloned().collect())
}
