use crate::error::{LmError, Result};

/// Running totals for a perplexity computation.
///
/// `perplexity = exp(-total_log_prob / total_tokens)`
#[derive(Debug, Default, Clone, Copy)]
pub struct PerplexityAccumulator {
	total_log_prob: f64,
	total_tokens: usize,
}

impl PerplexityAccumulator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds the log-probability of a sentence that scored `tokens` tokens.
	pub fn add(&mut self, log_prob: f64, tokens: usize) {
		self.total_log_prob += log_prob;
		self.total_tokens += tokens;
	}

	/// Adds each probability as one scored token.
	pub fn add_probs(&mut self, probs: &[f64]) {
		for p in probs {
			self.add(p.ln(), 1);
		}
	}

	pub fn total_tokens(&self) -> usize {
		self.total_tokens
	}

	/// Final perplexity.
	///
	/// # Errors
	/// - `EmptyEvaluationSet` if no token was scored
	/// - `DegeneratePerplexity` if a zero probability made the result infinite
	pub fn perplexity(&self) -> Result<f64> {
		if self.total_tokens == 0 {
			return Err(LmError::EmptyEvaluationSet);
		}
		let perplexity = (-self.total_log_prob / self.total_tokens as f64).exp();
		if !perplexity.is_finite() {
			return Err(LmError::DegeneratePerplexity(perplexity));
		}
		Ok(perplexity)
	}
}
