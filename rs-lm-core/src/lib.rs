//! Bigram language modelling library.
//!
//! This crate estimates the probability of token sequences from unigram and
//! bigram counts, and evaluates models through held-out perplexity:
//! - Forward bigram model smoothed by unigram interpolation
//! - Backward variant scoring sentences in reverse
//! - Bidirectional interpolation of both directions
//! - Tagged corpus reading, train/test splitting and model persistence
//!
//! ```no_run
//! use rs_lm_core::config::ModelConfig;
//! use rs_lm_core::corpus::{read_pos_tagged_files, split_corpus};
//! use rs_lm_core::model::LanguageModel;
//!
//! # fn main() -> rs_lm_core::Result<()> {
//! let sentences = read_pos_tagged_files(&["data/wsj"])?;
//! let split = split_corpus(sentences, 0.1, None)?;
//! let mut model = ModelConfig::default().build()?;
//! model.train(&split.train);
//! println!("Word Perplexity = {}", model.test(&split.test)?);
//! # Ok(())
//! # }
//! ```

/// Models, scoring and perplexity.
pub mod model;

/// Construction parameters and model factory.
pub mod config;

/// Tagged corpus reading and train/test splitting.
pub mod corpus;

/// Errors shared by the whole crate.
pub mod error;

/// Saving and loading trained models.
pub mod persistence;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::{LmError, Result};
