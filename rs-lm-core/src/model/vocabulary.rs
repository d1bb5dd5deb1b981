use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Interned token identifier.
pub type TokenId = u32;

/// Sentence-start boundary. Only ever used as context.
pub const START: TokenId = 0;
/// Sentence-end boundary. Scored like a token.
pub const END: TokenId = 1;
/// Bucket for tokens unseen during training.
pub const UNKNOWN: TokenId = 2;

const FIRST_WORD_ID: TokenId = 3;

/// Typed view of a token, used to query count tables.
///
/// Boundary and unknown symbols are distinct variants, so a corpus token
/// spelled `<S>` is still just a `Word`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol<'a> {
	Start,
	End,
	Unknown,
	Word(&'a str),
}

/// Bidirectional mapping between surface tokens and ids.
///
/// # Invariants
/// - Ids `0..3` are reserved for `START`, `END` and `UNKNOWN`
/// - Every surface token gets an id `>= 3`, assigned in first-seen order
/// - Ids are never reassigned
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Vocabulary {
	ids: HashMap<String, TokenId>,
	words: Vec<String>,
}

impl Vocabulary {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the id of `token`, creating one if needed.
	pub fn intern(&mut self, token: &str) -> TokenId {
		if let Some(&id) = self.ids.get(token) {
			return id;
		}
		let id = FIRST_WORD_ID + self.words.len() as TokenId;
		self.words.push(token.to_owned());
		self.ids.insert(token.to_owned(), id);
		id
	}

	/// Id of an already interned token.
	pub fn id(&self, token: &str) -> Option<TokenId> {
		self.ids.get(token).copied()
	}

	/// Id of a symbol. Reserved symbols always resolve.
	pub fn lookup(&self, symbol: Symbol<'_>) -> Option<TokenId> {
		match symbol {
			Symbol::Start => Some(START),
			Symbol::End => Some(END),
			Symbol::Unknown => Some(UNKNOWN),
			Symbol::Word(token) => self.id(token),
		}
	}

	/// Symbol carried by an id, if the id is known.
	pub fn symbol(&self, id: TokenId) -> Option<Symbol<'_>> {
		match id {
			START => Some(Symbol::Start),
			END => Some(Symbol::End),
			UNKNOWN => Some(Symbol::Unknown),
			_ => self
				.words
				.get((id - FIRST_WORD_ID) as usize)
				.map(|w| Symbol::Word(w.as_str())),
		}
	}

	/// Number of distinct surface tokens (reserved symbols excluded).
	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reserved_spellings_are_plain_words() {
		let mut vocabulary = Vocabulary::new();
		let id = vocabulary.intern("<S>");
		assert!(id >= FIRST_WORD_ID);
		assert_eq!(vocabulary.lookup(Symbol::Word("<S>")), Some(id));
		assert_eq!(vocabulary.lookup(Symbol::Start), Some(START));
		assert_eq!(vocabulary.symbol(id), Some(Symbol::Word("<S>")));
	}

	#[test]
	fn intern_is_idempotent() {
		let mut vocabulary = Vocabulary::new();
		let a = vocabulary.intern("dog");
		let b = vocabulary.intern("cat");
		assert_eq!(vocabulary.intern("dog"), a);
		assert_ne!(a, b);
		assert_eq!(vocabulary.len(), 2);
		assert_eq!(vocabulary.id("bird"), None);
		assert_eq!(vocabulary.symbol(99), None);
	}
}
