//! Reading LDC part-of-speech tagged text and splitting it for evaluation.
//!
//! The tagged format looks like:
//!
//! ```text
//! *x* header line *x*
//! ======================================
//! [ Pierre/NNP Vinken/NNP ]
//! ,/, will/MD join/VB
//! [ the/DT board/NN ]
//! ./.
//! ```
//!
//! Only surface words are kept; tags and chunk brackets are dropped.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::config::validate_weight;
use crate::error::Result;
use crate::io::{list_files, read_file};

/// Extension of tagged files picked up when walking a directory.
pub const TAGGED_FILE_EXTENSION: &str = "pos";

const HEADER_MARKER: &str = "*x*";
const SEPARATOR_MARKER: &str = "=====";
const SENTENCE_FINAL_TAG: &str = ".";

/// Training and test portions of a corpus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusSplit {
	pub train: Vec<Vec<String>>,
	pub test: Vec<Vec<String>>,
}

/// Parses tagged text into sentences of surface tokens.
///
/// # Behavior
/// - `*x*` header lines are ignored.
/// - A `=====` separator line closes the current sentence.
/// - A token tagged `.` closes the sentence after being added.
/// - `[` / `]` brackets and items without a tag are skipped.
/// - Empty sentences are dropped.
///
/// # Notes
/// Tokens are kept verbatim, no case folding.
pub fn parse_pos_tagged(text: &str) -> Vec<Vec<String>> {
	let mut sentences = Vec::new();
	let mut current = Vec::new();

	for line in text.lines() {
		let line = line.trim();
		if line.starts_with(HEADER_MARKER) {
			continue;
		}
		if line.starts_with(SEPARATOR_MARKER) {
			flush(&mut sentences, &mut current);
			continue;
		}

		for item in line.split_whitespace() {
			if item == "[" || item == "]" {
				continue;
			}
			let Some((word, tag)) = split_tagged(item) else {
				continue;
			};
			current.push(word);
			if tag == SENTENCE_FINAL_TAG {
				flush(&mut sentences, &mut current);
			}
		}
	}
	flush(&mut sentences, &mut current);

	sentences
}

fn flush(sentences: &mut Vec<Vec<String>>, current: &mut Vec<String>) {
	if !current.is_empty() {
		sentences.push(std::mem::take(current));
	}
}

/// Splits `word/TAG` at the last unescaped slash.
///
/// `\/` inside the word is unescaped to `/`. Returns `None` when there is
/// no tag or no word.
fn split_tagged(item: &str) -> Option<(String, &str)> {
	let bytes = item.as_bytes();
	let slash = (0..bytes.len())
		.rev()
		.find(|&i| bytes[i] == b'/' && (i == 0 || bytes[i - 1] != b'\\'))?;

	let (word, tag) = (&item[..slash], &item[slash + 1..]);
	if word.is_empty() || tag.is_empty() {
		return None;
	}
	Some((word.replace("\\/", "/"), tag))
}

/// Reads tagged sentences from files and directories, in argument order.
///
/// Directories are walked recursively for `*.pos` files, sorted by path.
pub fn read_pos_tagged_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Vec<String>>> {
	let mut sentences = Vec::new();

	for path in paths {
		let path = path.as_ref();
		if path.is_dir() {
			for file in list_files(path, TAGGED_FILE_EXTENSION)? {
				sentences.extend(parse_pos_tagged(&read_file(&file)?));
			}
		} else {
			sentences.extend(parse_pos_tagged(&read_file(path)?));
		}
	}

	Ok(sentences)
}

/// Splits a corpus into training and test sentences.
///
/// # Parameters
/// - `test_fraction`: share of sentences held out, in `[0, 1]`.
/// - `shuffle_seed`: when set, sentences are shuffled with a seeded RNG first.
///
/// # Behavior
/// `round(n * test_fraction)` sentences are taken from the end of the
/// (possibly shuffled) corpus as test data; the rest is training data.
pub fn split_corpus(
	mut sentences: Vec<Vec<String>>,
	test_fraction: f64,
	shuffle_seed: Option<u64>,
) -> Result<CorpusSplit> {
	validate_weight("test_fraction", test_fraction)?;

	if let Some(seed) = shuffle_seed {
		sentences.shuffle(&mut StdRng::seed_from_u64(seed));
	}

	let num_test = (sentences.len() as f64 * test_fraction).round() as usize;
	let test = sentences.split_off(sentences.len() - num_test);

	Ok(CorpusSplit { train: sentences, test })
}
