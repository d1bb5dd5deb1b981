//! Bigram language models and perplexity evaluation.
//!
//! This module provides:
//! - A smoothed forward bigram model (`BigramModel`)
//! - A backward adapter scoring reversed sentences (`BackwardBigramModel`)
//! - A forward/backward interpolation (`BidirectionalBigramModel`)
//! - The `LanguageModel` contract all three satisfy, and `Model`,
//!   which dispatches over them

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Backward adapter reusing the forward model on reversed sentences.
pub mod backward_model;

/// Interpolation of forward and backward per-token estimates.
pub mod bidirectional_model;

/// Forward bigram model with unigram interpolation smoothing.
///
/// Owns count tables, smoothing policy and scoring.
pub mod bigram_model;

/// Mutable count cell used as count-table value.
pub mod count;

/// Perplexity accumulation.
pub mod perplexity;

/// Token interning and reserved boundary symbols.
pub mod vocabulary;

use backward_model::BackwardBigramModel;
use bidirectional_model::BidirectionalBigramModel;
use bigram_model::BigramModel;
use perplexity::PerplexityAccumulator;

/// Contract shared by every scorable model.
///
/// A sentence is an ordered slice of surface tokens; boundary tokens are
/// added by the model, never by the caller.
pub trait LanguageModel {
	/// Accumulates counts from `sentences`. An empty corpus is a no-op.
	fn train(&mut self, sentences: &[Vec<String>]);

	/// Same as `train`, spread over `workers` threads.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `workers` is zero.
	fn train_parallel(&mut self, sentences: &[Vec<String>], workers: usize) -> Result<()>;

	/// Natural-log probability of `sentence`, end boundary included.
	fn sentence_log_prob(&self, sentence: &[String]) -> Result<f64>;

	/// Same value as `sentence_log_prob`, computed by summing the logs of
	/// `sentence_token_probs`.
	fn sentence_log_prob2(&self, sentence: &[String]) -> Result<f64> {
		Ok(self.sentence_token_probs(sentence)?.iter().map(|p| p.ln()).sum())
	}

	/// Probability of each token given its context, followed by the
	/// probability of the end boundary.
	///
	/// The result has length `sentence.len() + 1` and is in sentence order.
	fn sentence_token_probs(&self, sentence: &[String]) -> Result<Vec<f64>>;

	/// Perplexity over `sentences`, counting the end boundary as a token.
	///
	/// # Errors
	/// - `EmptyEvaluationSet` if `sentences` is empty
	/// - `DegeneratePerplexity` if a zero probability was scored
	fn test(&self, sentences: &[Vec<String>]) -> Result<f64> {
		let mut acc = PerplexityAccumulator::new();
		for sentence in sentences {
			acc.add(self.sentence_log_prob(sentence)?, sentence.len() + 1);
		}
		acc.perplexity()
	}

	/// Perplexity over `sentences`, excluding the end boundary from both
	/// the log-probability and the token count.
	///
	/// # Errors
	/// - `EmptyEvaluationSet` if there is no token to score
	/// - `DegeneratePerplexity` if a zero probability was scored
	fn test2(&self, sentences: &[Vec<String>]) -> Result<f64> {
		let mut acc = PerplexityAccumulator::new();
		for sentence in sentences {
			let probs = self.sentence_token_probs(sentence)?;
			acc.add_probs(&probs[..sentence.len()]);
		}
		acc.perplexity()
	}
}

/// Number of tokens in `sentences`, boundaries excluded.
pub fn word_count(sentences: &[Vec<String>]) -> usize {
	sentences.iter().map(Vec::len).sum()
}

/// Any model variant, selected at runtime.
///
/// Lets a single driver construct, persist and evaluate each variant.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum Model {
	Forward(BigramModel),
	Backward(BackwardBigramModel),
	Bidirectional(BidirectionalBigramModel),
}

impl Model {
	fn as_dyn(&self) -> &dyn LanguageModel {
		match self {
			Model::Forward(m) => m,
			Model::Backward(m) => m,
			Model::Bidirectional(m) => m,
		}
	}

	fn as_dyn_mut(&mut self) -> &mut dyn LanguageModel {
		match self {
			Model::Forward(m) => m,
			Model::Backward(m) => m,
			Model::Bidirectional(m) => m,
		}
	}

	/// Short variant name, used in reports.
	pub fn name(&self) -> &'static str {
		match self {
			Model::Forward(_) => "forward",
			Model::Backward(_) => "backward",
			Model::Bidirectional(_) => "bidirectional",
		}
	}
}

impl LanguageModel for Model {
	fn train(&mut self, sentences: &[Vec<String>]) {
		self.as_dyn_mut().train(sentences)
	}

	fn train_parallel(&mut self, sentences: &[Vec<String>], workers: usize) -> Result<()> {
		self.as_dyn_mut().train_parallel(sentences, workers)
	}

	fn sentence_log_prob(&self, sentence: &[String]) -> Result<f64> {
		self.as_dyn().sentence_log_prob(sentence)
	}

	fn sentence_log_prob2(&self, sentence: &[String]) -> Result<f64> {
		self.as_dyn().sentence_log_prob2(sentence)
	}

	fn sentence_token_probs(&self, sentence: &[String]) -> Result<Vec<f64>> {
		self.as_dyn().sentence_token_probs(sentence)
	}

	fn test(&self, sentences: &[Vec<String>]) -> Result<f64> {
		self.as_dyn().test(sentences)
	}

	fn test2(&self, sentences: &[Vec<String>]) -> Result<f64> {
		self.as_dyn().test2(sentences)
	}
}
