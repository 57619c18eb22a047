use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use wordvec_core::{VectorSource, WordVectors};
use wordvec_error::{PreconditionError, ResourceError, Result};

/// Open and parse a GloVe text file. See [`read_glove`].
pub fn load_glove(path: &Path, dims: usize, expected_entries: Option<usize>) -> Result<WordVectors> {
    let file = File::open(path).map_err(|e| ResourceError::io("open glove", path, e))?;
    read_glove(BufReader::new(file), path, dims, expected_entries)
}

/// Parse GloVe text: one word per line followed by exactly `dims` floats, whitespace
/// separated. Blank lines are skipped and the first occurrence of a repeated word wins.
/// When `expected_entries` is set the number of distinct words must match it exactly.
///
/// `path` is only used to label errors.
pub fn read_glove<R: BufRead>(
    reader: R,
    path: &Path,
    dims: usize,
    expected_entries: Option<usize>,
) -> Result<WordVectors> {
    let mut vectors = WordVectors::with_capacity(dims, expected_entries.unwrap_or(0));
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| ResourceError::io("read glove", path, e))?;
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            continue;
        };
        let vector = parts
            .map(str::parse::<f32>)
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| ResourceError::Malformed {
                path: path.to_path_buf(),
                line: line_no,
                message: format!("component of '{word}': {e}"),
            })?;
        if vector.len() != dims {
            return Err(PreconditionError::VectorLength {
                word: word.to_string(),
                line: line_no,
                expected: dims,
                actual: vector.len(),
            }
            .into());
        }
        vectors.insert_first(word, vector)?;
    }

    if let Some(expected) = expected_entries {
        if vectors.len() != expected {
            return Err(PreconditionError::EntryCount {
                path: path.to_path_buf(),
                expected,
                actual: vectors.len(),
            }
            .into());
        }
    }
    Ok(vectors)
}
