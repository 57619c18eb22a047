use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use wordvec_core::VectorSource;
use wordvec_error::{ResourceError, Result};

use crate::model::TrainedModel;

/// The parameters that name a trained artifact. Two training requests with the same key share
/// one file, whatever corpus they were given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelKey {
    pub dims: usize,
    pub min_count: usize,
    pub window: usize,
}

impl ModelKey {
    pub fn new(dims: usize, min_count: usize, window: usize) -> Self {
        Self {
            dims,
            min_count,
            window,
        }
    }

    /// `{dims}features_{min_count}minwords_{window}context`
    pub fn file_name(&self) -> String {
        format!(
            "{}features_{}minwords_{}context",
            self.dims, self.min_count, self.window
        )
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// Directory of trained models addressed by [`ModelKey`].
///
/// There is no invalidation: once an artifact exists for a key it is returned as-is. Writes are
/// not atomic and nothing locks the directory, so concurrent writers for the same key race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCache {
    dir: PathBuf,
}

impl ModelCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &ModelKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    pub fn contains(&self, key: &ModelKey) -> bool {
        self.path_for(key).is_file()
    }

    pub fn load(&self, key: &ModelKey) -> Result<TrainedModel> {
        let path = self.path_for(key);
        let file = File::open(&path).map_err(|e| ResourceError::io("open model", &path, e))?;
        let model: TrainedModel = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| ResourceError::corrupt(&path, e))?;
        if model.dims() != key.dims {
            return Err(ResourceError::corrupt(
                &path,
                format!("stored vectors have {} dims, key says {}", model.dims(), key.dims),
            )
            .into());
        }
        Ok(model)
    }

    /// Persist `model` under `key`, creating the cache directory if needed.
    pub fn store(&self, key: &ModelKey, model: &TrainedModel) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| ResourceError::io("create model dir", &self.dir, e))?;
        let path = self.path_for(key);
        let file = File::create(&path).map_err(|e| ResourceError::io("create model", &path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, model).map_err(|e| ResourceError::corrupt(&path, e))?;
        writer
            .flush()
            .map_err(|e| ResourceError::io("write model", &path, e))?;
        Ok(path)
    }
}
