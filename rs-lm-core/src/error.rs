//! Error type shared by every model, corpus and persistence operation.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = LmError> = std::result::Result<T, E>;

/// Failures raised while configuring, training, scoring or persisting a model.
#[derive(Debug, Error)]
pub enum LmError {
	/// A weight or option is outside its valid range.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// Filesystem failure, with the offending path when known.
	#[error("io error while processing {path:?}: {source}")]
	Io {
		source: std::io::Error,
		path: Option<PathBuf>,
	},

	/// Model (de)serialization failed.
	#[error("serialization error: {0}")]
	Serialization(String),

	/// Perplexity was requested over zero scored tokens.
	#[error("cannot compute perplexity over an empty evaluation set")]
	EmptyEvaluationSet,

	/// Forward and backward per-token probabilities are not aligned.
	#[error("per-token probability length mismatch: expected {expected}, forward {forward}, backward {backward}")]
	LengthMismatch {
		expected: usize,
		forward: usize,
		backward: usize,
	},

	/// A zero probability was scored, so perplexity diverged.
	#[error("perplexity is not finite ({0})")]
	DegeneratePerplexity(f64),

	/// Two count tables cannot be merged.
	#[error("incompatible models: {0}")]
	IncompatibleModels(String),

	#[error("internal error: {0}")]
	Internal(String),
}

impl From<postcard::Error> for LmError {
	fn from(err: postcard::Error) -> Self {
		Self::Serialization(err.to_string())
	}
}

impl LmError {
	/// Wraps an IO error together with the path it concerns.
	pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
		Self::Io { source, path }
	}
}
