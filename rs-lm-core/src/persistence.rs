use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{LmError, Result};
use crate::io::build_output_path;

/// Default location of a trained model: `<stem>.bin` next to `corpus_path`.
pub fn default_model_path<P: AsRef<Path>>(corpus_path: P) -> Result<PathBuf> {
	build_output_path(corpus_path, "bin")
}

/// Writes a model to disk using `postcard`.
pub fn save<M: Serialize, P: AsRef<Path>>(model: &M, path: P) -> Result<()> {
	let path = path.as_ref();
	let bytes = postcard::to_stdvec(model)?;
	std::fs::write(path, bytes).map_err(|e| LmError::io(e, Some(path.to_path_buf())))
}

/// Reads a model previously written by `save`.
pub fn load<M: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<M> {
	let path = path.as_ref();
	let bytes = std::fs::read(path).map_err(|e| LmError::io(e, Some(path.to_path_buf())))?;
	Ok(postcard::from_bytes(&bytes)?)
}
