use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LmError, Result};

/// Reads a whole text file into memory.
///
/// The path is attached to the error on failure.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> Result<String> {
	let path = filename.as_ref();
	fs::read_to_string(path).map_err(|e| LmError::io(e, Some(path.to_path_buf())))
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/wsj.pos` + `"bin"` → `data/wsj.bin`
///
/// A directory input keeps its name as the stem: `data/wsj/` → `data/wsj.bin`.
pub(crate) fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path.file_stem().ok_or_else(|| {
		LmError::io(
			std::io::Error::new(std::io::ErrorKind::InvalidInput, "Input path has no filename"),
			Some(input_path.to_path_buf()),
		)
	})?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Recursively lists all files with a given extension below a directory.
///
/// Returns full paths, sorted so that corpus order is stable across platforms.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
	let mut files = Vec::new();
	collect_files(dir.as_ref(), extension, &mut files)?;
	files.sort();
	Ok(files)
}

fn collect_files(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> Result<()> {
	let entries = fs::read_dir(dir).map_err(|e| LmError::io(e, Some(dir.to_path_buf())))?;

	for entry in entries {
		let entry = entry.map_err(|e| LmError::io(e, Some(dir.to_path_buf())))?;
		let path = entry.path();

		if path.is_dir() {
			collect_files(&path, extension, files)?;
		} else if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			files.push(path);
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn output_path_replaces_extension() {
		let output = build_output_path("data/wsj.pos", "bin").unwrap();
		assert_eq!(output, PathBuf::from("data/wsj.bin"));
	}

	#[test]
	fn list_files_walks_subdirectories() {
		let dir = tempfile::tempdir().unwrap();
		let nested = dir.path().join("00");
		fs::create_dir(&nested).unwrap();
		fs::write(dir.path().join("b.pos"), "").unwrap();
		fs::write(nested.join("a.pos"), "").unwrap();
		fs::write(dir.path().join("readme.txt"), "").unwrap();

		let files = list_files(dir.path(), "pos").unwrap();
		assert_eq!(files, vec![nested.join("a.pos"), dir.path().join("b.pos")]);
	}

	#[test]
	fn read_file_reports_path() {
		let err = read_file("does/not/exist.pos").unwrap_err();
		match err {
			LmError::Io { path, .. } => assert_eq!(path, Some(PathBuf::from("does/not/exist.pos"))),
			other => panic!("unexpected error {other:?}"),
		}
	}
}
