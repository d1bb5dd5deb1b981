use serde::{Deserialize, Serialize};

/// Mutable frequency accumulator stored as a count-table value.
///
/// Counts are kept as `f64` so that probabilities can be derived
/// without casts, while training only ever adds whole numbers.
///
/// ## Invariants
/// - A freshly created count is `0.0`
/// - Training never decrements a count
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Count(f64);

impl Count {
	/// Creates a count starting at zero.
	pub fn new() -> Self {
		Self(0.0)
	}

	/// Adds one and returns the new value.
	pub fn increment(&mut self) -> f64 {
		self.increment_by(1.0)
	}

	/// Adds `amount` and returns the new value.
	pub fn increment_by(&mut self, amount: f64) -> f64 {
		self.0 += amount;
		self.0
	}

	/// Subtracts one and returns the new value.
	pub fn decrement(&mut self) -> f64 {
		self.decrement_by(1.0)
	}

	/// Subtracts `amount` and returns the new value.
	pub fn decrement_by(&mut self, amount: f64) -> f64 {
		self.0 -= amount;
		self.0
	}

	/// Current value.
	pub fn value(&self) -> f64 {
		self.0
	}

	/// Overwrites the value and returns it.
	pub fn set_value(&mut self, value: f64) -> f64 {
		self.0 = value;
		self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	#[test]
	fn updates_in_place_inside_a_map() {
		let mut table: HashMap<&str, Count> = HashMap::new();
		table.entry("dog").or_default().increment();
		table.entry("dog").or_default().increment();
		table.entry("cat").or_default().increment_by(3.0);

		assert_eq!(table["dog"].value(), 2.0);
		assert_eq!(table["cat"].value(), 3.0);
	}

	#[test]
	fn decrement_and_set() {
		let mut count = Count::new();
		assert_eq!(count.increment_by(5.0), 5.0);
		assert_eq!(count.decrement(), 4.0);
		assert_eq!(count.decrement_by(1.5), 2.5);
		assert_eq!(count.set_value(7.0), 7.0);
		assert_eq!(count.value(), 7.0);
	}
}
