use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wordvec_core::{EmbeddingMatrix, TokenMatrix, Vocabulary};
use wordvec_embed::{
    EmbedConfig, ModelCache, PretrainedFormat, PretrainedLoader, TrainingLoader,
};
use wordvec_error::{ResultExt, TracingPolicy};

/// Build embedding-layer weights for a vocabulary from trained or pretrained word vectors.
#[derive(Parser, Debug)]
#[command(name = "wordvec", version, about = "Word vectors as embedding-layer weights")]
struct Args {
    /// TOML configuration file (default: $WORDVEC_CONFIG, then ~/.config/wordvec/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train (or load a cached) model on a corpus and resolve the vocabulary against it
    Train {
        /// Text corpus, one whitespace-tokenized sentence per line
        #[arg(long)]
        corpus: PathBuf,

        /// Vocabulary file, one word per line; line order is row order
        #[arg(long)]
        vocab: PathBuf,

        #[arg(long)]
        dims: Option<usize>,

        #[arg(long)]
        min_count: Option<usize>,

        #[arg(long)]
        window: Option<usize>,

        /// Seed for the vectors generated for unknown words
        #[arg(long)]
        seed: Option<u64>,

        /// Write the matrix here as JSON rows instead of logging its shape
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Resolve the vocabulary against a pretrained resource in the model directory
    Pretrained {
        /// GoogleNews or glove
        #[arg(long)]
        format: String,

        #[arg(long)]
        vocab: PathBuf,

        /// Defaults to `training.dims` from the configuration
        #[arg(long)]
        dims: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let args = Args::parse();
    info!("Starting wordvec with args: {:?}", args);
    let policy = TracingPolicy;

    let config = EmbedConfig::load(args.config.as_deref()).emit_event(&policy)?;

    let (matrix, out) = match args.command {
        Command::Train {
            corpus,
            vocab,
            dims,
            min_count,
            window,
            seed,
            out,
        } => {
            let vocabulary = read_vocabulary(&vocab)?;
            let sentences = read_corpus(&corpus)?;
            let (tokens, dropped) = TokenMatrix::encode(&sentences, &vocabulary);
            if dropped > 0 {
                warn!(dropped, "corpus tokens not in the vocabulary were dropped");
            }

            let mut params = config.training.clone();
            params.dims = requested_dims(dims, &config);
            params.min_count = min_count.unwrap_or(params.min_count);
            params.window = window.unwrap_or(params.window);

            let loader = TrainingLoader::with_default_trainer(ModelCache::new(config.model_dir.clone()));
            let mut rng = rng_from(seed);
            let matrix = loader
                .resolve(&tokens, &vocabulary, &params, &mut rng)
                .emit_event(&policy)?;
            (matrix, out)
        }
        Command::Pretrained {
            format,
            vocab,
            dims,
            seed,
            out,
        } => {
            let format: PretrainedFormat = format
                .parse()
                .map_err(wordvec_error::Error::from)
                .emit_event(&policy)?;
            let vocabulary = read_vocabulary(&vocab)?;
            let loader =
                PretrainedLoader::from_config(config.model_dir.clone(), config.pretrained.clone());
            let mut rng = rng_from(seed);
            let matrix = loader
                .resolve(format, &vocabulary, requested_dims(dims, &config), &mut rng)
                .emit_event(&policy)?;
            (matrix, out)
        }
    };

    report(&matrix, out.as_deref())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn requested_dims(flag: Option<usize>, config: &EmbedConfig) -> usize {
    flag.unwrap_or(config.training.dims)
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn read_vocabulary(path: &Path) -> Result<Vocabulary> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read vocabulary {}", path.display()))?;
    let words = text.lines().map(str::trim).filter(|w| !w.is_empty());
    Ok(Vocabulary::new(words)?)
}

fn read_corpus(path: &Path) -> Result<Vec<Vec<String>>> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read corpus {}", path.display()))?;
    Ok(text
        .lines()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect())
}

fn report(matrix: &EmbeddingMatrix, out: Option<&Path>) -> Result<()> {
    let stats = matrix.stats();
    let (rows, dims) = matrix.shape();
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).wrap_err_with(|| {
                    format!("Failed to create output directory {}", parent.display())
                })?;
            }
            let file = File::create(path)
                .wrap_err_with(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, matrix)?;
            writer.flush()?;
            info!(rows, dims, path = %path.display(), "wrote embedding matrix");
        }
        None => info!(
            rows,
            dims,
            found = stats.found,
            generated = stats.generated,
            "resolved embedding matrix"
        ),
    }
    Ok(())
}
