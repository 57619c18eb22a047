use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use wordvec_error::{Error, ResourceError, Result};

use crate::trainer::TrainingParams;
use crate::DEFAULT_MODEL_DIR;

/// Environment variable naming a config file to use when none is passed explicitly.
pub const CONFIG_ENV: &str = "WORDVEC_CONFIG";
/// Environment variable overriding `model_dir` after the file is parsed.
pub const MODEL_DIR_ENV: &str = "WORDVEC_MODEL_DIR";

/// Where the fixed pretrained resources live and what they are expected to contain.
#[derive(Debug, Clone, PartialEq)]
pub struct PretrainedConfig {
    /// File name of the binary GoogleNews vectors inside the model directory.
    pub google_news_file: String,
    /// GloVe files are named `{glove_prefix}.{dims}d.txt`.
    pub glove_prefix: String,
    /// Distinct words a GloVe file must contain; `None` skips the check.
    pub glove_expected_entries: Option<usize>,
}

impl Default for PretrainedConfig {
    fn default() -> Self {
        Self {
            google_news_file: "GoogleNews-vectors-negative300.bin.gz".to_string(),
            glove_prefix: "glove.6B".to_string(),
            glove_expected_entries: Some(400_000),
        }
    }
}

impl PretrainedConfig {
    pub fn glove_file(&self, dims: usize) -> String {
        format!("{}.{}d.txt", self.glove_prefix, dims)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedConfig {
    pub model_dir: PathBuf,
    pub training: TrainingParams,
    pub pretrained: PretrainedConfig,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            training: TrainingParams::default(),
            pretrained: PretrainedConfig::default(),
        }
    }
}

/** Raw TOML mapping for the [training] table. */
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTraining {
    dims: Option<usize>,
    min_count: Option<usize>,
    window: Option<usize>,
    sample: Option<f64>,
    workers: Option<usize>,
    negative: Option<usize>,
    epochs: Option<usize>,
    alpha: Option<f32>,
    min_alpha: Option<f32>,
    seed: Option<u64>,
    finalize: Option<bool>,
}

/** Raw TOML mapping for the [pretrained] table. */
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPretrained {
    google_news_file: Option<String>,
    glove_prefix: Option<String>,
    glove_expected_entries: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    model_dir: Option<PathBuf>,
    #[serde(default)]
    training: RawTraining,
    #[serde(default)]
    pretrained: RawPretrained,
}

impl EmbedConfig {
    /// Parse a configuration from TOML. Absent keys keep their defaults.
    ///
    /// Example TOML:
    /// model_dir = "word2vec_models"
    ///
    /// [training]
    /// dims = 100
    /// window = 5
    ///
    /// [pretrained]
    /// glove_expected_entries = 0   # 0 disables the entry-count check
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let raw: RawConfig =
            toml::from_str(input).map_err(|e| Error::Config(format!("TOML parse error: {e}")))?;

        let defaults = TrainingParams::default();
        let t = raw.training;
        let training = TrainingParams {
            dims: t.dims.unwrap_or(defaults.dims),
            min_count: t.min_count.unwrap_or(defaults.min_count),
            window: t.window.unwrap_or(defaults.window),
            sample: t.sample.unwrap_or(defaults.sample),
            workers: t.workers.unwrap_or(defaults.workers),
            negative: t.negative.unwrap_or(defaults.negative),
            epochs: t.epochs.unwrap_or(defaults.epochs),
            alpha: t.alpha.unwrap_or(defaults.alpha),
            min_alpha: t.min_alpha.unwrap_or(defaults.min_alpha),
            seed: t.seed.unwrap_or(defaults.seed),
            finalize: t.finalize.unwrap_or(defaults.finalize),
        };
        training.validate()?;

        let defaults = PretrainedConfig::default();
        let p = raw.pretrained;
        let pretrained = PretrainedConfig {
            google_news_file: p.google_news_file.unwrap_or(defaults.google_news_file),
            glove_prefix: p.glove_prefix.unwrap_or(defaults.glove_prefix),
            glove_expected_entries: match p.glove_expected_entries {
                Some(0) => None,
                Some(n) => Some(n),
                None => defaults.glove_expected_entries,
            },
        };

        Ok(EmbedConfig {
            model_dir: raw.model_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR)),
            training,
            pretrained,
        })
    }

    /// Load configuration from a specific file path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| ResourceError::io("read config", path, e))?;
        Self::from_toml_str(&content)
    }

    /// Compute the default config file path.
    /// Uses $XDG_CONFIG_HOME/wordvec/config.toml or ~/.config/wordvec/config.toml.
    pub fn default_config_path() -> Option<PathBuf> {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
            .map(|base| base.join("wordvec").join("config.toml"))
    }

    /// Resolve configuration the way the binary does: an explicit path must exist, then
    /// `$WORDVEC_CONFIG`, then the default path if present, else built-in defaults.
    /// `$WORDVEC_MODEL_DIR` overrides the model directory in every case.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut cfg = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                Self::load_from_path(&path)?
            }
            None => match Self::default_config_path().filter(|p| p.is_file()) {
                Some(path) => {
                    debug!(path = %path.display(), "loading default config");
                    Self::load_from_path(&path)?
                }
                None => Self::default(),
            },
        };
        if let Some(dir) = std::env::var_os(MODEL_DIR_ENV) {
            cfg.model_dir = PathBuf::from(dir);
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = EmbedConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, EmbedConfig::default());
        assert_eq!(cfg.training.dims, 300);
        assert_eq!(cfg.training.window, 10);
        assert_eq!(cfg.pretrained.glove_expected_entries, Some(400_000));
    }

    #[test]
    fn partial_tables_merge_with_defaults() {
        let cfg = EmbedConfig::from_toml_str(
            r#"
            model_dir = "/tmp/vectors"

            [training]
            dims = 50
            window = 5
            finalize = false

            [pretrained]
            glove_prefix = "glove.42B"
            glove_expected_entries = 0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.model_dir, PathBuf::from("/tmp/vectors"));
        assert_eq!(cfg.training.dims, 50);
        assert_eq!(cfg.training.window, 5);
        assert_eq!(cfg.training.min_count, 1);
        assert!(!cfg.training.finalize);
        assert_eq!(cfg.pretrained.glove_file(50), "glove.42B.50d.txt");
        assert_eq!(cfg.pretrained.glove_expected_entries, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = EmbedConfig::from_toml_str("[training]\nsize = 100\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn invalid_training_values_are_rejected() {
        let err = EmbedConfig::from_toml_str("[training]\nworkers = 0\n").unwrap_err();
        assert!(err.is_precondition());
    }

    /// Restores the variables `load` reads when dropped.
    struct EnvGuard(Vec<(&'static str, Option<std::ffi::OsString>)>);

    impl EnvGuard {
        fn capture() -> Self {
            EnvGuard(
                [CONFIG_ENV, MODEL_DIR_ENV, "XDG_CONFIG_HOME"]
                    .into_iter()
                    .map(|k| (k, std::env::var_os(k)))
                    .collect(),
            )
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in &self.0 {
                match value {
                    Some(v) => std::env::set_var(key, v),
                    None => std::env::remove_var(key),
                }
            }
        }
    }

    fn write_config(path: &Path, dims: usize) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, format!("[training]\ndims = {dims}\n")).unwrap();
    }

    // Every step mutates process-wide variables, so the whole lookup order lives in one test.
    #[test]
    fn load_resolves_sources_in_order() {
        let _guard = EnvGuard::capture();
        let tmp = tempfile::tempdir().unwrap();
        let explicit = tmp.path().join("explicit.toml");
        let from_env = tmp.path().join("env.toml");
        let xdg = tmp.path().join("xdg");
        write_config(&explicit, 11);
        write_config(&from_env, 22);
        write_config(&xdg.join("wordvec").join("config.toml"), 33);

        std::env::remove_var(MODEL_DIR_ENV);
        std::env::set_var(CONFIG_ENV, &from_env);
        std::env::set_var("XDG_CONFIG_HOME", &xdg);

        assert_eq!(EmbedConfig::load(Some(explicit.as_path())).unwrap().training.dims, 11);
        assert_eq!(EmbedConfig::load(None).unwrap().training.dims, 22);

        std::env::remove_var(CONFIG_ENV);
        assert_eq!(
            EmbedConfig::default_config_path(),
            Some(xdg.join("wordvec").join("config.toml"))
        );
        assert_eq!(EmbedConfig::load(None).unwrap().training.dims, 33);

        std::env::set_var("XDG_CONFIG_HOME", tmp.path().join("empty"));
        assert_eq!(EmbedConfig::load(None).unwrap(), EmbedConfig::default());

        std::env::set_var(MODEL_DIR_ENV, tmp.path().join("models"));
        let cfg = EmbedConfig::load(Some(explicit.as_path())).unwrap();
        assert_eq!(cfg.model_dir, tmp.path().join("models"));
        assert_eq!(cfg.training.dims, 11);

        let err = EmbedConfig::load(Some(tmp.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(
            err,
            Error::Resource(ResourceError::FileOperation { .. })
        ));
    }
}
