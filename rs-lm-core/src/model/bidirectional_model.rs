use serde::{Deserialize, Serialize};

use super::backward_model::BackwardBigramModel;
use super::bigram_model::BigramModel;
use super::LanguageModel;
use crate::config::validate_weight;
use crate::error::{LmError, Result};

/// Linear interpolation of a forward and a backward bigram model.
///
/// Both models are trained independently on the same corpus. Each
/// position of a sentence is scored by both, and the two estimates are
/// combined with fixed weights:
///
/// `P(w_i) = forward_lambda · P_fwd(w_i) + backward_lambda · P_bwd(w_i)`
///
/// The weights usually sum to 1 but are not required to.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BidirectionalBigramModel {
	forward: BigramModel,
	backward: BackwardBigramModel,
	forward_lambda: f64,
	backward_lambda: f64,
}

impl BidirectionalBigramModel {
	/// Creates an untrained bidirectional model.
	///
	/// # Parameters
	/// - `lambda`: bigram weight of both directional sub-models.
	/// - `forward_lambda`: weight of the forward estimate.
	/// - `backward_lambda`: weight of the backward estimate.
	///
	/// # Errors
	/// Returns `InvalidConfig` if any weight is outside `[0, 1]`.
	pub fn new(lambda: f64, forward_lambda: f64, backward_lambda: f64) -> Result<Self> {
		validate_weight("forward_lambda", forward_lambda)?;
		validate_weight("backward_lambda", backward_lambda)?;
		Ok(Self {
			forward: BigramModel::new(lambda)?,
			backward: BackwardBigramModel::new(lambda)?,
			forward_lambda,
			backward_lambda,
		})
	}

	pub fn forward(&self) -> &BigramModel {
		&self.forward
	}

	pub fn backward(&self) -> &BackwardBigramModel {
		&self.backward
	}

	pub fn forward_lambda(&self) -> f64 {
		self.forward_lambda
	}

	pub fn backward_lambda(&self) -> f64 {
		self.backward_lambda
	}

	fn interpolate(&self, forward: f64, backward: f64) -> f64 {
		self.forward_lambda * forward + self.backward_lambda * backward
	}
}

impl LanguageModel for BidirectionalBigramModel {
	fn train(&mut self, sentences: &[Vec<String>]) {
		self.forward.train(sentences);
		self.backward.train(sentences);
	}

	fn train_parallel(&mut self, sentences: &[Vec<String>], workers: usize) -> Result<()> {
		self.forward.train_parallel(sentences, workers)?;
		self.backward.train_parallel(sentences, workers)
	}

	fn sentence_log_prob(&self, sentence: &[String]) -> Result<f64> {
		Ok(self.sentence_token_probs(sentence)?.iter().map(|p| p.ln()).sum())
	}

	/// Interpolated probability of every position, end boundary last.
	///
	/// # Errors
	/// Returns `LengthMismatch` if the sub-models disagree on the number
	/// of positions, which would otherwise silently corrupt perplexity.
	fn sentence_token_probs(&self, sentence: &[String]) -> Result<Vec<f64>> {
		let forward = self.forward.sentence_token_probs(sentence)?;
		let backward = self.backward.sentence_token_probs(sentence)?;

		let expected = sentence.len() + 1;
		if forward.len() != expected || backward.len() != expected {
			return Err(LmError::LengthMismatch {
				expected,
				forward: forward.len(),
				backward: backward.len(),
			});
		}

		Ok(forward
			.iter()
			.zip(&backward)
			.map(|(f, b)| self.interpolate(*f, *b))
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn corpus() -> Vec<Vec<String>> {
		[["a", "b", "c"], ["c", "b", "a"], ["a", "a", "b"]]
			.iter()
			.map(|s| s.iter().map(|t| t.to_string()).collect())
			.collect()
	}

	#[test]
	fn combines_position_by_position() {
		let mut model = BidirectionalBigramModel::new(0.7, 0.3, 0.7).unwrap();
		model.train(&corpus());

		let s: Vec<String> = vec!["b".into(), "c".into()];
		let forward = model.forward().sentence_token_probs(&s).unwrap();
		let backward = model.backward().sentence_token_probs(&s).unwrap();
		let combined = model.sentence_token_probs(&s).unwrap();

		assert_eq!(combined.len(), 3);
		for i in 0..combined.len() {
			let expected = 0.3 * forward[i] + 0.7 * backward[i];
			assert!((combined[i] - expected).abs() < 1e-12);
		}
	}

	#[test]
	fn rejects_invalid_weights() {
		assert!(BidirectionalBigramModel::new(0.5, 1.2, 0.5).is_err());
		assert!(BidirectionalBigramModel::new(0.5, 0.5, -0.5).is_err());
		assert!(BidirectionalBigramModel::new(2.0, 0.5, 0.5).is_err());
	}

	#[test]
	fn sub_models_train_independently() {
		let mut model = BidirectionalBigramModel::new(0.5, 0.5, 0.5).unwrap();
		model.train(&corpus());
		assert_eq!(model.forward().token_count(), 15.0);
		assert_eq!(model.backward().inner().token_count(), 15.0);
	}
}
