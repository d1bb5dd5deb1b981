use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{info, warn};

use rs_lm_core::LmError;
use rs_lm_core::config::{DEFAULT_DIRECTION_LAMBDA, DEFAULT_LAMBDA, ModelConfig, ModelKind};
use rs_lm_core::corpus::{read_pos_tagged_files, split_corpus};
use rs_lm_core::model::{LanguageModel, Model, word_count};
use rs_lm_core::persistence;

/// Train a bigram language model on tagged text and report held-out perplexity.
#[derive(Parser, Debug)]
#[command(name = "rs-lm-eval", version)]
struct Args {
    /// Tagged files or directories of `.pos` files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Fraction of sentences, taken from the end, used as test data
    #[arg(short, long)]
    test_fraction: f64,

    /// Estimation strategy
    #[arg(short, long, value_enum, default_value_t = Variant::Forward)]
    model: Variant,

    /// Bigram weight of the unigram interpolation
    #[arg(long, default_value_t = DEFAULT_LAMBDA)]
    lambda: f64,

    /// Weight of the forward estimate (bidirectional only)
    #[arg(long, default_value_t = DEFAULT_DIRECTION_LAMBDA)]
    forward_lambda: f64,

    /// Weight of the backward estimate (bidirectional only)
    #[arg(long, default_value_t = DEFAULT_DIRECTION_LAMBDA)]
    backward_lambda: f64,

    /// Training threads (defaults to the number of CPUs)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Shuffle sentences with this seed before splitting
    #[arg(long)]
    shuffle_seed: Option<u64>,

    /// Save the trained model to this path
    #[arg(long, conflicts_with = "cache")]
    save: Option<PathBuf>,

    /// Save the trained model next to the first input, as `<stem>.bin`
    #[arg(long)]
    cache: bool,

    /// Load a trained model instead of training one
    #[arg(long, conflicts_with_all = ["save", "cache"])]
    load: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Variant {
    Forward,
    Backward,
    Bidirectional,
}

impl From<Variant> for ModelKind {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Forward => ModelKind::Forward,
            Variant::Backward => ModelKind::Backward,
            Variant::Bidirectional => ModelKind::Bidirectional,
        }
    }
}

impl Args {
    fn model_config(&self) -> ModelConfig {
        ModelConfig {
            kind: self.model.into(),
            lambda: self.lambda,
            forward_lambda: self.forward_lambda,
            backward_lambda: self.backward_lambda,
            workers: self.workers,
        }
    }

    fn save_path(&self) -> Result<Option<PathBuf>, LmError> {
        if let Some(path) = &self.save {
            return Ok(Some(path.clone()));
        }
        if self.cache {
            return persistence::default_model_path(&self.files[0]).map(Some);
        }
        Ok(None)
    }
}

/// Reports perplexity of both measures, with and without the end boundary.
fn report(model: &Model, sentences: &[Vec<String>]) -> Result<(), LmError> {
    for (label, result) in [
        ("Word Perplexity", model.test(sentences)),
        ("Word Perplexity (excluding </S>)", model.test2(sentences)),
    ] {
        match result {
            Ok(perplexity) => println!("{label} = {perplexity}"),
            Err(LmError::EmptyEvaluationSet) => warn!("{label}: no sentences to evaluate"),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = args.model_config();
    config.validate()?;

    let sentences = read_pos_tagged_files(&args.files)?;
    info!("read {} sentences from {} input(s)", sentences.len(), args.files.len());

    let split = split_corpus(sentences, args.test_fraction, args.shuffle_seed)?;
    println!(
        "# Train Sentences = {} (# words = {}) \n# Test Sentences = {} (# words = {})",
        split.train.len(),
        word_count(&split.train),
        split.test.len(),
        word_count(&split.test)
    );

    let model = match &args.load {
        Some(path) => {
            let model: Model = persistence::load(path)?;
            info!("loaded {} model from {}", model.name(), path.display());
            model
        }
        None => {
            let mut model = config.build()?;
            println!("Training...");
            model.train_parallel(&split.train, config.effective_workers())?;
            if let Some(path) = args.save_path()? {
                persistence::save(&model, &path)?;
                info!("saved {} model to {}", model.name(), path.display());
            }
            model
        }
    };

    // Test on training data using test and test2
    report(&model, &split.train)?;

    println!("Testing...");
    report(&model, &split.test)?;

    Ok(())
}
