//! Persistent collections over [`Value`].
//!
//! Updates take `&self` and return a new collection; unmodified structure is shared with
//! the original through `im`'s reference-counted trees.

use std::hash::{Hash, Hasher};

use crate::model::Value;
use crate::model::structural::{combine_ordered, combine_unordered, structural_hash};

/// Read-side contract shared by [`List`], [`Map`], and [`Set`].
pub trait PersistentCollection {
	/// Number of elements (entries for maps).
	fn len(&self) -> usize;

	/// Whether the collection has no elements.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Structural hash: order-dependent for lists, order-independent for sets and maps.
	fn hash_code(&self) -> i32;
}

/// Immutable ordered sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct List(im::Vector<Value>);

impl List {
	/// Empty list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Element at `index`.
	pub fn get(&self, index: usize) -> Option<&Value> {
		self.0.get(index)
	}

	/// Iterate elements in order.
	pub fn iter(&self) -> impl Iterator<Item = &Value> {
		self.0.iter()
	}

	/// Copy with `value` appended.
	pub fn push(&self, value: impl Into<Value>) -> Self {
		let mut next = self.0.clone();
		next.push_back(value.into());
		Self(next)
	}

	/// Copy with the element at `index` replaced; `None` when out of bounds.
	pub fn set(&self, index: usize, value: impl Into<Value>) -> Option<Self> {
		if index >= self.0.len() {
			return None;
		}
		Some(Self(self.0.update(index, value.into())))
	}

	/// Copy without the element at `index`; `None` when out of bounds.
	pub fn remove(&self, index: usize) -> Option<Self> {
		if index >= self.0.len() {
			return None;
		}
		let mut next = self.0.clone();
		next.remove(index);
		Some(Self(next))
	}
}

impl PersistentCollection for List {
	fn len(&self) -> usize {
		self.0.len()
	}

	fn hash_code(&self) -> i32 {
		combine_ordered(self.0.iter().map(structural_hash))
	}
}

impl Hash for List {
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_i32(self.hash_code());
	}
}

impl FromIterator<Value> for List {
	fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl From<Vec<Value>> for List {
	fn from(values: Vec<Value>) -> Self {
		values.into_iter().collect()
	}
}

/// Immutable map ordered by structural key order.
///
/// Keys compare structurally, so two distinct maps or messages with the same content
/// address the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Map(im::OrdMap<Value, Value>);

impl Map {
	/// Empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Value stored under `key`.
	pub fn get(&self, key: &Value) -> Option<&Value> {
		self.0.get(key)
	}

	/// Whether `key` has an entry.
	pub fn contains_key(&self, key: &Value) -> bool {
		self.0.contains_key(key)
	}

	/// Iterate entries in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
		self.0.iter()
	}

	/// Iterate keys in order.
	pub fn keys(&self) -> impl Iterator<Item = &Value> {
		self.0.keys()
	}

	/// Iterate values in key order.
	pub fn values(&self) -> impl Iterator<Item = &Value> {
		self.0.values()
	}

	/// Copy with `key` bound to `value`, replacing any structurally equal key.
	pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) -> Self {
		Self(self.0.update(key.into(), value.into()))
	}

	/// Copy without `key`.
	pub fn remove(&self, key: &Value) -> Self {
		Self(self.0.without(key))
	}
}

impl PersistentCollection for Map {
	fn len(&self) -> usize {
		self.0.len()
	}

	fn hash_code(&self) -> i32 {
		combine_unordered(self.0.iter().map(|(key, value)| structural_hash(key) ^ structural_hash(value)))
	}
}

impl Hash for Map {
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_i32(self.hash_code());
	}
}

impl FromIterator<(Value, Value)> for Map {
	fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// Immutable set ordered by structural element order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Set(im::OrdSet<Value>);

impl Set {
	/// Empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether a structurally equal element is present.
	pub fn contains(&self, value: &Value) -> bool {
		self.0.contains(value)
	}

	/// Iterate elements in order.
	pub fn iter(&self) -> impl Iterator<Item = &Value> {
		self.0.iter()
	}

	/// Copy with `value` added.
	pub fn add(&self, value: impl Into<Value>) -> Self {
		Self(self.0.update(value.into()))
	}

	/// Copy without `value`.
	pub fn remove(&self, value: &Value) -> Self {
		Self(self.0.without(value))
	}
}

impl PersistentCollection for Set {
	fn len(&self) -> usize {
		self.0.len()
	}

	fn hash_code(&self) -> i32 {
		combine_unordered(self.0.iter().map(structural_hash))
	}
}

impl Hash for Set {
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_i32(self.hash_code());
	}
}

impl FromIterator<Value> for Set {
	fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}
