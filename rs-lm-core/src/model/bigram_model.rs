use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::count::Count;
use super::vocabulary::{END, START, Symbol, TokenId, UNKNOWN, Vocabulary};
use super::LanguageModel;
use crate::config::validate_weight;
use crate::error::{LmError, Result};

/// Pseudo-count reserved for the unknown symbol in the unigram distribution.
pub const UNKNOWN_PSEUDO_COUNT: f64 = 1.0;

/// Number of training chunks handed to each worker thread.
const CHUNKS_PER_WORKER: usize = 8;

/// Forward bigram language model smoothed by fixed-weight interpolation
/// with a unigram model.
///
/// `P(w | v) = λ · c(v, w) / c(v) + (1 − λ) · c(w) / (N + 1)`
///
/// where `N` counts every training token including one start and one end
/// boundary per sentence, and the extra `1` is the pseudo-count reserved
/// for the unknown symbol.
///
/// # Responsibilities
/// - Accumulate unigram and bigram counts, boundaries included
/// - Convert counts into smoothed conditional probabilities
/// - Score sentences as log-probabilities or per-token probabilities
/// - Merge partial count tables (parallel training)
///
/// # Invariants
/// - `lambda` is in `[0, 1]` and never changes
/// - Counts only grow, and only while training or merging
/// - `token_count` equals the sum of all unigram counts
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BigramModel {
	/// Weight of the bigram estimate; `1 − lambda` goes to the unigram estimate.
	lambda: f64,

	vocabulary: Vocabulary,

	/// Occurrences of each token, boundaries included.
	unigrams: HashMap<TokenId, Count>,

	/// Occurrences of each (previous, current) pair.
	bigrams: HashMap<(TokenId, TokenId), Count>,

	/// Total number of counted unigram tokens.
	token_count: Count,
}

impl BigramModel {
	/// Creates an untrained model with bigram weight `lambda`.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `lambda` is outside `[0, 1]`.
	pub fn new(lambda: f64) -> Result<Self> {
		validate_weight("lambda", lambda)?;
		Ok(Self::untrained(lambda))
	}

	fn untrained(lambda: f64) -> Self {
		Self {
			lambda,
			vocabulary: Vocabulary::new(),
			unigrams: HashMap::new(),
			bigrams: HashMap::new(),
			token_count: Count::new(),
		}
	}

	pub fn lambda(&self) -> f64 {
		self.lambda
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	/// Total number of counted tokens, boundaries included.
	pub fn token_count(&self) -> f64 {
		self.token_count.value()
	}

	/// Whether any sentence has been counted.
	pub fn is_trained(&self) -> bool {
		self.token_count.value() > 0.0
	}

	/// Raw unigram count of a symbol (`0.0` if never seen).
	pub fn unigram_count(&self, symbol: Symbol<'_>) -> f64 {
		self.vocabulary
			.lookup(symbol)
			.map_or(0.0, |id| self.unigram_value(id))
	}

	/// Raw count of the pair `(previous, current)`.
	pub fn bigram_count(&self, previous: Symbol<'_>, current: Symbol<'_>) -> f64 {
		match (self.vocabulary.lookup(previous), self.vocabulary.lookup(current)) {
			(Some(prev), Some(cur)) => self.bigram_value(prev, cur),
			_ => 0.0,
		}
	}

	/// Smoothed probability of `current` following `previous`.
	///
	/// # Notes
	/// - Unseen tokens (either side) are mapped to the unknown symbol.
	/// - A context with zero count has no bigram estimate; the unigram
	///   estimate is then used with full weight.
	pub fn conditional_prob(&self, previous: Symbol<'_>, current: Symbol<'_>) -> f64 {
		let prev = self.vocabulary.lookup(previous).unwrap_or(UNKNOWN);
		let cur = self.vocabulary.lookup(current).unwrap_or(UNKNOWN);
		self.token_prob(prev, cur)
	}

	/// Discards every count, keeping `lambda`.
	///
	/// Training twice without clearing accumulates both corpora.
	pub fn clear(&mut self) {
		*self = Self::untrained(self.lambda);
	}

	/// Merges another model's counts into this one.
	///
	/// # Behavior
	/// - Tokens of `other` are interned into this vocabulary.
	/// - Unigram, bigram and total counts are summed.
	///
	/// # Errors
	/// Returns `IncompatibleModels` if the smoothing weights differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.lambda != other.lambda {
			return Err(LmError::IncompatibleModels(format!(
				"lambda mismatch: self={}, other={}",
				self.lambda, other.lambda
			)));
		}

		for (id, count) in &other.unigrams {
			let id = remap(&mut self.vocabulary, &other.vocabulary, *id)?;
			self.unigrams.entry(id).or_default().increment_by(count.value());
		}
		for ((prev, cur), count) in &other.bigrams {
			let prev = remap(&mut self.vocabulary, &other.vocabulary, *prev)?;
			let cur = remap(&mut self.vocabulary, &other.vocabulary, *cur)?;
			self.bigrams.entry((prev, cur)).or_default().increment_by(count.value());
		}
		self.token_count.increment_by(other.token_count.value());

		Ok(())
	}

	/// Counts one sentence framed by start and end boundaries.
	fn train_sentence(&mut self, sentence: &[String]) {
		let mut prev = START;
		self.count_unigram(START);

		for token in sentence {
			let id = self.vocabulary.intern(token);
			self.count_unigram(id);
			self.bigrams.entry((prev, id)).or_default().increment();
			prev = id;
		}

		self.count_unigram(END);
		self.bigrams.entry((prev, END)).or_default().increment();
	}

	fn count_unigram(&mut self, id: TokenId) {
		self.unigrams.entry(id).or_default().increment();
		self.token_count.increment();
	}

	fn warn_if_trained(&self) {
		if self.is_trained() {
			warn!(
				"training a model that already holds {} tokens; counts will accumulate",
				self.token_count.value()
			);
		}
	}

	fn unigram_value(&self, id: TokenId) -> f64 {
		self.unigrams.get(&id).map_or(0.0, Count::value)
	}

	fn bigram_value(&self, prev: TokenId, cur: TokenId) -> f64 {
		self.bigrams.get(&(prev, cur)).map_or(0.0, Count::value)
	}

	/// Id of a surface token at scoring time.
	fn resolve(&self, token: &str) -> TokenId {
		self.vocabulary.id(token).unwrap_or(UNKNOWN)
	}

	/// Unigram estimate, with the unknown symbol holding the reserved pseudo-count.
	fn unigram_prob(&self, id: TokenId) -> f64 {
		let count = if id == UNKNOWN { UNKNOWN_PSEUDO_COUNT } else { self.unigram_value(id) };
		count / (self.token_count.value() + UNKNOWN_PSEUDO_COUNT)
	}

	/// Interpolated probability of `cur` given `prev`.
	///
	/// Every scoring path goes through here.
	fn token_prob(&self, prev: TokenId, cur: TokenId) -> f64 {
		// A target never counted (including an untrained end boundary) is unknown.
		let cur = if self.unigram_value(cur) > 0.0 { cur } else { UNKNOWN };
		let unigram = self.unigram_prob(cur);

		let context = self.unigram_value(prev);
		if context <= 0.0 {
			return unigram;
		}

		let bigram = self.bigram_value(prev, cur) / context;
		self.lambda * bigram + (1.0 - self.lambda) * unigram
	}
}

/// Translates an id of `other` into the matching id of `vocabulary`.
fn remap(vocabulary: &mut Vocabulary, other: &Vocabulary, id: TokenId) -> Result<TokenId> {
	match other.symbol(id) {
		Some(Symbol::Word(token)) => Ok(vocabulary.intern(token)),
		Some(_) => Ok(id),
		None => Err(LmError::Internal(format!("token id {id} missing from vocabulary"))),
	}
}

impl LanguageModel for BigramModel {
	fn train(&mut self, sentences: &[Vec<String>]) {
		self.warn_if_trained();
		for sentence in sentences {
			self.train_sentence(sentence);
		}
		debug!(
			"counted {} sentences: {} tokens, {} types",
			sentences.len(),
			self.token_count.value(),
			self.vocabulary.len()
		);
	}

	/// Builds partial models on scoped threads and merges them.
	///
	/// # Behavior
	/// - Splits the corpus into `workers * 8` chunks.
	/// - Each thread counts one chunk into a fresh model with the same `lambda`.
	/// - Partial models are collected through an MPSC channel and merged sequentially.
	///
	/// # Notes
	/// Counts are whole numbers, so the result equals sequential training.
	fn train_parallel(&mut self, sentences: &[Vec<String>], workers: usize) -> Result<()> {
		if workers == 0 {
			return Err(LmError::InvalidConfig("workers must be greater than zero".to_owned()));
		}
		if workers == 1 || sentences.is_empty() {
			self.train(sentences);
			return Ok(());
		}
		self.warn_if_trained();

		let chunks = workers * CHUNKS_PER_WORKER;
		let chunk_size = sentences.len().div_ceil(chunks);
		let lambda = self.lambda;

		let (tx, rx) = mpsc::channel();
		let panicked = thread::scope(|scope| {
			let handles: Vec<_> = sentences
				.chunks(chunk_size)
				.map(|chunk| {
					let tx = tx.clone();
					scope.spawn(move || {
						let mut partial = BigramModel::untrained(lambda);
						for sentence in chunk {
							partial.train_sentence(sentence);
						}
						// The receiver outlives the scope.
						let _ = tx.send(partial);
					})
				})
				.collect();
			handles.into_iter().filter_map(|h| h.join().err()).count()
		});
		drop(tx);

		if panicked > 0 {
			return Err(LmError::Internal(format!("{panicked} training worker(s) panicked")));
		}

		let mut merged = 0;
		for partial in rx.iter() {
			self.merge(&partial)?;
			merged += 1;
		}

		info!(
			"merged {merged} partial models: {} tokens, {} types",
			self.token_count.value(),
			self.vocabulary.len()
		);
		Ok(())
	}

	fn sentence_log_prob(&self, sentence: &[String]) -> Result<f64> {
		let mut prev = START;
		let mut log_prob = 0.0;
		for token in sentence {
			let cur = self.resolve(token);
			log_prob += self.token_prob(prev, cur).ln();
			prev = cur;
		}
		log_prob += self.token_prob(prev, END).ln();
		Ok(log_prob)
	}

	fn sentence_token_probs(&self, sentence: &[String]) -> Result<Vec<f64>> {
		let ids: Vec<TokenId> = std::iter::once(START)
			.chain(sentence.iter().map(|token| self.resolve(token)))
			.chain(std::iter::once(END))
			.collect();

		Ok(ids.windows(2).map(|pair| self.token_prob(pair[0], pair[1])).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sentences(raw: &[&[&str]]) -> Vec<Vec<String>> {
		raw.iter()
			.map(|s| s.iter().map(|t| t.to_string()).collect())
			.collect()
	}

	fn trained(lambda: f64) -> BigramModel {
		let mut model = BigramModel::new(lambda).unwrap();
		model.train(&sentences(&[&["the", "dog", "ran"], &["the", "cat", "sat"]]));
		model
	}

	#[test]
	fn counts_include_boundaries() {
		let model = trained(0.5);
		assert_eq!(model.unigram_count(Symbol::Word("the")), 2.0);
		assert_eq!(model.unigram_count(Symbol::Start), 2.0);
		assert_eq!(model.unigram_count(Symbol::End), 2.0);
		assert_eq!(model.unigram_count(Symbol::Unknown), 0.0);
		assert_eq!(model.bigram_count(Symbol::Word("the"), Symbol::Word("dog")), 1.0);
		assert_eq!(model.bigram_count(Symbol::Start, Symbol::Word("the")), 2.0);
		assert_eq!(model.bigram_count(Symbol::Word("sat"), Symbol::End), 1.0);
		assert_eq!(model.token_count(), 10.0);
	}

	#[test]
	fn interpolates_bigram_and_unigram() {
		let model = trained(0.5);
		let expected = 0.5 * (1.0 / 2.0) + 0.5 * (1.0 / 11.0);
		let p = model.conditional_prob(Symbol::Word("the"), Symbol::Word("dog"));
		assert!((p - expected).abs() < 1e-12);
	}

	#[test]
	fn unseen_target_uses_unknown_mass() {
		let model = trained(0.5);
		let p = model.conditional_prob(Symbol::Word("the"), Symbol::Word("bird"));
		assert!((p - 0.5 / 11.0).abs() < 1e-12);
	}

	#[test]
	fn unseen_context_falls_back_to_unigram() {
		let model = trained(0.9);
		let p = model.conditional_prob(Symbol::Word("bird"), Symbol::Word("the"));
		assert!((p - 2.0 / 11.0).abs() < 1e-12);
	}

	#[test]
	fn rejects_out_of_range_lambda() {
		assert!(matches!(BigramModel::new(1.5), Err(LmError::InvalidConfig(_))));
		assert!(matches!(BigramModel::new(-0.1), Err(LmError::InvalidConfig(_))));
	}

	#[test]
	fn untrained_model_scores_everything_as_unknown() {
		let mut model = BigramModel::new(0.5).unwrap();
		model.train(&[]);
		assert!(!model.is_trained());
		let probs = model.sentence_token_probs(&["a".to_string(), "b".to_string()]).unwrap();
		assert_eq!(probs, vec![1.0, 1.0, 1.0]);
	}

	#[test]
	fn merge_matches_joint_training() {
		let corpus = sentences(&[&["a", "b"], &["b", "c", "a"], &["c"]]);
		let mut joint = BigramModel::new(0.7).unwrap();
		joint.train(&corpus);

		let mut left = BigramModel::new(0.7).unwrap();
		left.train(&corpus[..1]);
		let mut right = BigramModel::new(0.7).unwrap();
		right.train(&corpus[1..]);
		left.merge(&right).unwrap();

		assert_eq!(left.token_count(), joint.token_count());
		for s in &corpus {
			assert_eq!(left.sentence_token_probs(s).unwrap(), joint.sentence_token_probs(s).unwrap());
		}
	}

	#[test]
	fn merge_rejects_different_lambda() {
		let mut a = BigramModel::new(0.5).unwrap();
		let b = BigramModel::new(0.6).unwrap();
		assert!(matches!(a.merge(&b), Err(LmError::IncompatibleModels(_))));
	}

	#[test]
	fn clear_resets_counts() {
		let mut model = trained(0.5);
		model.clear();
		assert!(!model.is_trained());
		assert_eq!(model.unigram_count(Symbol::Word("the")), 0.0);
		assert_eq!(model.lambda(), 0.5);
	}

	#[test]
	fn parallel_training_matches_sequential() {
		let corpus: Vec<Vec<String>> = (0..200)
			.map(|i| (0..(i % 7 + 1)).map(|j| format!("w{}", (i * j) % 13)).collect())
			.collect();

		let mut sequential = BigramModel::new(0.8).unwrap();
		sequential.train(&corpus);
		let mut parallel = BigramModel::new(0.8).unwrap();
		parallel.train_parallel(&corpus, 4).unwrap();

		assert_eq!(parallel.token_count(), sequential.token_count());
		assert_eq!(parallel.vocabulary().len(), sequential.vocabulary().len());
		for s in corpus.iter().take(20) {
			let a = parallel.sentence_log_prob(s).unwrap();
			let b = sequential.sentence_log_prob(s).unwrap();
			assert!((a - b).abs() < 1e-9);
		}
	}

	#[test]
	fn zero_workers_is_invalid() {
		let mut model = BigramModel::new(0.5).unwrap();
		assert!(model.train_parallel(&[], 0).is_err());
	}
}
