use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};
use wordvec_error::{InternalError, Result};

use super::{EmbeddingTrainer, TrainingParams};
use crate::model::TrainedModel;

/// Sentences per synchronous update step.
const BATCH_SENTENCES: usize = 256;
const UNIGRAM_POWER: f64 = 0.75;
const MAX_EXP: f32 = 6.0;

/// Skip-gram with negative sampling.
///
/// Each batch of sentences is split into `workers` shards. Shards compute their updates against
/// the same snapshot of the weights on a dedicated rayon pool, and the updates are applied in
/// shard order afterwards, so a fixed `seed` always yields the same vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipGramTrainer;

impl EmbeddingTrainer for SkipGramTrainer {
    fn train(&self, sentences: &[Vec<String>], params: &TrainingParams) -> Result<TrainedModel> {
        params.validate()?;
        let vocab = CountedVocab::build(sentences, params.min_count);
        if vocab.words.is_empty() {
            return Err(InternalError::Training(format!(
                "no word occurs at least {} times in {} sentences",
                params.min_count,
                sentences.len()
            ))
            .into());
        }
        info!(
            words = vocab.words.len(),
            sentences = sentences.len(),
            dims = params.dims,
            epochs = params.epochs,
            workers = params.workers,
            "training skip-gram model"
        );

        let ctx = ShardContext {
            keep: keep_probabilities(&vocab.counts, params.sample),
            table: NegativeTable::new(&vocab.counts),
            window: params.window,
            negative: params.negative,
        };
        let mut weights = Weights::init(vocab.words.len(), params.dims, params.seed);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.workers)
            .build()
            .map_err(|e| {
                InternalError::Training(format!("could not start {} workers: {e}", params.workers))
            })?;

        let total = (params.epochs * vocab.sentences.len()).max(1) as f32;
        let mut processed = 0usize;
        let mut step = 0u64;
        for epoch in 0..params.epochs {
            for batch in vocab.sentences.chunks(BATCH_SENTENCES) {
                let progress = processed as f32 / total;
                let lr = (params.alpha - (params.alpha - params.min_alpha) * progress)
                    .max(params.min_alpha);
                let shard_len = batch.len().div_ceil(params.workers);
                let snapshot = &weights;
                let shard_ctx = &ctx;
                let deltas: Vec<Delta> = pool.install(|| {
                    batch
                        .par_chunks(shard_len)
                        .enumerate()
                        .map(|(shard, sentences)| {
                            let mut rng = StdRng::seed_from_u64(shard_seed(params, step, shard));
                            shard_ctx.train_shard(sentences, snapshot, lr, &mut rng)
                        })
                        .collect()
                });
                for delta in deltas {
                    weights.apply(delta);
                }
                processed += batch.len();
                step += 1;
            }
            debug!(epoch, "finished epoch");
        }

        let words = vocab.words.into_iter().map(str::to_owned).collect();
        TrainedModel::new(params.dims, words, weights.input)
    }
}

fn shard_seed(params: &TrainingParams, step: u64, shard: usize) -> u64 {
    params
        .seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(step.wrapping_mul(params.workers as u64))
        .wrapping_add(shard as u64)
}

/// Words that survive `min_count`, most frequent first, and the sentences re-encoded
/// against them.
struct CountedVocab<'a> {
    words: Vec<&'a str>,
    counts: Vec<u64>,
    sentences: Vec<Vec<u32>>,
}

impl<'a> CountedVocab<'a> {
    fn build(sentences: &'a [Vec<String>], min_count: usize) -> Self {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for word in sentences.iter().flatten() {
            *counts.entry(word.as_str()).or_default() += 1;
        }
        let mut kept: Vec<(&str, u64)> = counts
            .into_iter()
            .filter(|&(_, c)| c >= min_count as u64)
            .collect();
        kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let index: HashMap<&str, u32> = kept
            .iter()
            .enumerate()
            .map(|(i, (w, _))| (*w, i as u32))
            .collect();
        let encoded = sentences
            .iter()
            .map(|s| {
                s.iter()
                    .filter_map(|w| index.get(w.as_str()).copied())
                    .collect::<Vec<u32>>()
            })
            .collect();

        let (words, counts) = kept.into_iter().unzip();
        Self {
            words,
            counts,
            sentences: encoded,
        }
    }
}

/// Probability of keeping each occurrence of a word under frequent-word downsampling.
fn keep_probabilities(counts: &[u64], sample: f64) -> Vec<f64> {
    if sample <= 0.0 {
        return vec![1.0; counts.len()];
    }
    let threshold = sample * counts.iter().sum::<u64>() as f64;
    counts
        .iter()
        .map(|&c| {
            let c = c as f64;
            (((c / threshold).sqrt() + 1.0) * threshold / c).min(1.0)
        })
        .collect()
}

/// Draws negative samples proportionally to count^0.75.
struct NegativeTable {
    cumulative: Vec<f64>,
    total: f64,
}

impl NegativeTable {
    fn new(counts: &[u64]) -> Self {
        let mut total = 0.0;
        let cumulative = counts
            .iter()
            .map(|&c| {
                total += (c as f64).powf(UNIGRAM_POWER);
                total
            })
            .collect();
        Self { cumulative, total }
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> u32 {
        let x = rng.gen::<f64>() * self.total;
        let idx = self.cumulative.partition_point(|&c| c <= x);
        idx.min(self.cumulative.len() - 1) as u32
    }
}

struct Weights {
    dims: usize,
    input: Vec<f32>,
    output: Vec<f32>,
}

impl Weights {
    fn init(words: usize, dims: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let scale = dims as f32;
        let input = (0..words * dims)
            .map(|_| (rng.gen::<f32>() - 0.5) / scale)
            .collect();
        Self {
            dims,
            input,
            output: vec![0.0; words * dims],
        }
    }

    fn apply(&mut self, delta: Delta) {
        let dims = self.dims;
        for (row, d) in delta.input {
            let start = row as usize * dims;
            for (w, g) in self.input[start..start + dims].iter_mut().zip(d) {
                *w += g;
            }
        }
        for (row, d) in delta.output {
            let start = row as usize * dims;
            for (w, g) in self.output[start..start + dims].iter_mut().zip(d) {
                *w += g;
            }
        }
    }
}

/// Accumulated updates from one shard, keyed by row.
#[derive(Default)]
struct Delta {
    input: HashMap<u32, Vec<f32>>,
    output: HashMap<u32, Vec<f32>>,
}

struct ShardContext {
    keep: Vec<f64>,
    table: NegativeTable,
    window: usize,
    negative: usize,
}

impl ShardContext {
    fn train_shard(
        &self,
        sentences: &[Vec<u32>],
        weights: &Weights,
        lr: f32,
        rng: &mut StdRng,
    ) -> Delta {
        let dims = weights.dims;
        let mut delta = Delta::default();
        let mut l1 = vec![0.0f32; dims];
        let mut neu1e = vec![0.0f32; dims];

        for sentence in sentences {
            let kept: Vec<u32> = sentence
                .iter()
                .copied()
                .filter(|&w| {
                    let p = self.keep[w as usize];
                    p >= 1.0 || rng.gen::<f64>() < p
                })
                .collect();

            for (pos, &center) in kept.iter().enumerate() {
                let span = self.window - rng.gen_range(0..self.window);
                let start = pos.saturating_sub(span);
                let end = (pos + span + 1).min(kept.len());
                for (ctx_pos, &context) in kept.iter().enumerate().take(end).skip(start) {
                    if ctx_pos == pos {
                        continue;
                    }
                    current_row(&weights.input, delta.input.get(&context), context, &mut l1);
                    neu1e.iter_mut().for_each(|x| *x = 0.0);

                    for d in 0..=self.negative {
                        let (target, label) = if d == 0 {
                            (center, 1.0)
                        } else {
                            let t = self.table.sample(rng);
                            if t == center {
                                continue;
                            }
                            (t, 0.0)
                        };
                        let base = &weights.output[target as usize * dims..][..dims];
                        let out = delta
                            .output
                            .entry(target)
                            .or_insert_with(|| vec![0.0; dims]);
                        let f: f32 = (0..dims).map(|i| l1[i] * (base[i] + out[i])).sum();
                        let g = (label - sigmoid(f)) * lr;
                        for i in 0..dims {
                            neu1e[i] += g * (base[i] + out[i]);
                            out[i] += g * l1[i];
                        }
                    }

                    let inp = delta
                        .input
                        .entry(context)
                        .or_insert_with(|| vec![0.0; dims]);
                    for (acc, e) in inp.iter_mut().zip(&neu1e) {
                        *acc += e;
                    }
                }
            }
        }
        delta
    }
}

/// Snapshot row plus whatever this shard has already added to it.
fn current_row(snapshot: &[f32], local: Option<&Vec<f32>>, row: u32, out: &mut [f32]) {
    let dims = out.len();
    let base = &snapshot[row as usize * dims..][..dims];
    match local {
        Some(d) => {
            for i in 0..dims {
                out[i] = base[i] + d[i];
            }
        }
        None => out.copy_from_slice(base),
    }
}

fn sigmoid(f: f32) -> f32 {
    if f > MAX_EXP {
        1.0
    } else if f < -MAX_EXP {
        0.0
    } else {
        1.0 / (1.0 + (-f).exp())
    }
}
