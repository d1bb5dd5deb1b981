use serde::{Deserialize, Serialize};

use crate::error::{LmError, Result};
use crate::model::Model;
use crate::model::backward_model::BackwardBigramModel;
use crate::model::bidirectional_model::BidirectionalBigramModel;
use crate::model::bigram_model::BigramModel;

/// Bigram weight used when none is given.
pub const DEFAULT_LAMBDA: f64 = 0.9;

/// Weight of each direction in a bidirectional model when none is given.
pub const DEFAULT_DIRECTION_LAMBDA: f64 = 0.5;

/// Which estimation strategy to build.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ModelKind {
	/// Predicts each token from its predecessor.
	#[default]
	Forward,
	/// Predicts each token from its successor.
	Backward,
	/// Interpolates forward and backward estimates.
	Bidirectional,
}

/// Construction parameters for any model variant.
///
/// # Invariants
/// - Every weight lies in `[0, 1]` once validated
/// - `workers`, when set, is non-zero
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
	pub kind: ModelKind,

	/// Bigram weight of every directional model.
	pub lambda: f64,

	/// Weight of the forward estimate (bidirectional only).
	pub forward_lambda: f64,

	/// Weight of the backward estimate (bidirectional only).
	pub backward_lambda: f64,

	/// Training threads; `None` uses one per logical CPU.
	pub workers: Option<usize>,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self {
			kind: ModelKind::Forward,
			lambda: DEFAULT_LAMBDA,
			forward_lambda: DEFAULT_DIRECTION_LAMBDA,
			backward_lambda: DEFAULT_DIRECTION_LAMBDA,
			workers: None,
		}
	}
}

impl ModelConfig {
	/// Checks every weight and the worker count.
	pub fn validate(&self) -> Result<()> {
		validate_weight("lambda", self.lambda)?;
		validate_weight("forward_lambda", self.forward_lambda)?;
		validate_weight("backward_lambda", self.backward_lambda)?;
		if self.workers == Some(0) {
			return Err(LmError::InvalidConfig("workers must be greater than zero".to_owned()));
		}
		Ok(())
	}

	/// Number of training threads to use.
	pub fn effective_workers(&self) -> usize {
		self.workers.unwrap_or_else(num_cpus::get)
	}

	/// Builds an untrained model of the configured kind.
	pub fn build(&self) -> Result<Model> {
		self.validate()?;
		Ok(match self.kind {
			ModelKind::Forward => Model::Forward(BigramModel::new(self.lambda)?),
			ModelKind::Backward => Model::Backward(BackwardBigramModel::new(self.lambda)?),
			ModelKind::Bidirectional => Model::Bidirectional(BidirectionalBigramModel::new(
				self.lambda,
				self.forward_lambda,
				self.backward_lambda,
			)?),
		})
	}
}

/// Rejects a weight outside `[0, 1]` (NaN included).
pub(crate) fn validate_weight(name: &str, value: f64) -> Result<()> {
	if !(0.0..=1.0).contains(&value) {
		return Err(LmError::InvalidConfig(format!(
			"{name} must be between 0.0 and 1.0, got {value}"
		)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_config_is_valid() {
		let config = ModelConfig::default();
		assert!(config.validate().is_ok());
		assert_eq!(config.build().unwrap().name(), "forward");
	}

	#[test]
	fn builds_each_kind() {
		for (kind, name) in [
			(ModelKind::Forward, "forward"),
			(ModelKind::Backward, "backward"),
			(ModelKind::Bidirectional, "bidirectional"),
		] {
			let config = ModelConfig { kind, ..ModelConfig::default() };
			assert_eq!(config.build().unwrap().name(), name);
		}
	}

	#[test]
	fn rejects_bad_values() {
		let nan = ModelConfig { lambda: f64::NAN, ..ModelConfig::default() };
		assert!(nan.validate().is_err());
		let workers = ModelConfig { workers: Some(0), ..ModelConfig::default() };
		assert!(workers.build().is_err());
		let backward = ModelConfig { backward_lambda: 1.01, ..ModelConfig::default() };
		assert!(backward.validate().is_err());
	}

	#[test]
	fn effective_workers_defaults_to_cpus() {
		assert_eq!(ModelConfig::default().effective_workers(), num_cpus::get());
		let config = ModelConfig { workers: Some(3), ..ModelConfig::default() };
		assert_eq!(config.effective_workers(), 3);
	}
}
