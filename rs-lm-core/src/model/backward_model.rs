use serde::{Deserialize, Serialize};

use super::bigram_model::BigramModel;
use super::LanguageModel;
use crate::error::Result;

/// Bigram model applied to sentences in reverse, so that each token is
/// predicted from the token that follows it.
///
/// Training and scoring both reverse the sentence before delegating to
/// an inner forward `BigramModel`. Per-token results are returned in the
/// original token order.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BackwardBigramModel {
	inner: BigramModel,
}

impl BackwardBigramModel {
	/// Creates an untrained backward model with bigram weight `lambda`.
	pub fn new(lambda: f64) -> Result<Self> {
		Ok(Self { inner: BigramModel::new(lambda)? })
	}

	/// The forward model trained on reversed sentences.
	pub fn inner(&self) -> &BigramModel {
		&self.inner
	}
}

/// Copy of `sentence` with its tokens in reverse order.
pub fn reverse_sentence(sentence: &[String]) -> Vec<String> {
	sentence.iter().rev().cloned().collect()
}

/// Reverses every sentence of a corpus, keeping sentence order.
pub fn reverse_sentences(sentences: &[Vec<String>]) -> Vec<Vec<String>> {
	sentences.iter().map(|s| reverse_sentence(s)).collect()
}

/// Restores original token order for probabilities scored on a reversed sentence.
///
/// ```text
///               original: This is a sentence </S>
///     reversed, scored:   sentence a is This </S>
///               restored: This is a sentence </S>
/// ```
///
/// The end boundary is always last and stays last; the other positions are reversed.
pub fn restore_token_order(mut probs: Vec<f64>) -> Vec<f64> {
	if let Some(end) = probs.pop() {
		probs.reverse();
		probs.push(end);
	}
	probs
}

impl LanguageModel for BackwardBigramModel {
	fn train(&mut self, sentences: &[Vec<String>]) {
		self.inner.train(&reverse_sentences(sentences));
	}

	fn train_parallel(&mut self, sentences: &[Vec<String>], workers: usize) -> Result<()> {
		self.inner.train_parallel(&reverse_sentences(sentences), workers)
	}

	fn sentence_log_prob(&self, sentence: &[String]) -> Result<f64> {
		self.inner.sentence_log_prob(&reverse_sentence(sentence))
	}

	fn sentence_log_prob2(&self, sentence: &[String]) -> Result<f64> {
		self.inner.sentence_log_prob2(&reverse_sentence(sentence))
	}

	fn sentence_token_probs(&self, sentence: &[String]) -> Result<Vec<f64>> {
		let probs = self.inner.sentence_token_probs(&reverse_sentence(sentence))?;
		Ok(restore_token_order(probs))
	}
}
