use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bytes::Bytes;
use num_bigint::BigInt;
use url::Url;

use crate::model::structural::{structural_cmp, structural_hash};
use crate::model::{Decimal, Instant, List, Map, MessageValue, Rational, Set};

/// Immutable runtime value carried by message fields.
///
/// `Eq`, `Ord`, and `Hash` are structural (see [`crate::model::structural`]); numbers
/// compare with `f64::total_cmp`, so `NaN` equals itself and `-0` differs from `0`.
#[derive(Debug, Clone)]
pub enum Value {
	/// Explicit null.
	Null,
	/// Boolean.
	Bool(bool),
	/// Double-precision number.
	Number(f64),
	/// Arbitrary-precision integer (`123n`).
	BigInt(BigInt),
	/// UTF-8 text.
	String(Arc<str>),
	/// Ordered sequence.
	List(List),
	/// Key-ordered map.
	Map(Map),
	/// Ordered set.
	Set(Set),
	/// Nested message.
	Message(MessageValue),
	/// Instant (`D"..."`).
	Date(Instant),
	/// URL (`U"..."`).
	Url(Url),
	/// Byte buffer (`B"..."`).
	Bytes(Bytes),
	/// Fixed-point decimal.
	Decimal(Decimal),
	/// Reduced fraction (`Q n/d`).
	Rational(Rational),
}

impl Value {
	/// Stable lowercase label of the value's variant.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Number(_) => "number",
			Self::BigInt(_) => "bigint",
			Self::String(_) => "string",
			Self::List(_) => "list",
			Self::Map(_) => "map",
			Self::Set(_) => "set",
			Self::Message(_) => "message",
			Self::Date(_) => "date",
			Self::Url(_) => "url",
			Self::Bytes(_) => "bytes",
			Self::Decimal(_) => "decimal",
			Self::Rational(_) => "rational",
		}
	}

	/// Structural hash of this value.
	pub fn hash_code(&self) -> i32 {
		structural_hash(self)
	}

	/// Whether this is [`Value::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Borrow text content.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(text) => Some(text),
			_ => None,
		}
	}

	/// Number content.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Number(number) => Some(*number),
			_ => None,
		}
	}

	/// Boolean content.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(flag) => Some(*flag),
			_ => None,
		}
	}

	/// Nested message.
	pub fn as_message(&self) -> Option<&MessageValue> {
		match self {
			Self::Message(message) => Some(message),
			_ => None,
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		structural_cmp(self, other) == Ordering::Equal
	}
}

impl Eq for Value {}

impl PartialOrd for Value {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Value {
	fn cmp(&self, other: &Self) -> Ordering {
		structural_cmp(self, other)
	}
}

impl Hash for Value {
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_i32(structural_hash(self));
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Number(f64::from(value))
	}
}

impl From<BigInt> for Value {
	fn from(value: BigInt) -> Self {
		Self::BigInt(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(Arc::from(value))
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(Arc::from(value))
	}
}

impl From<List> for Value {
	fn from(value: List) -> Self {
		Self::List(value)
	}
}

impl From<Map> for Value {
	fn from(value: Map) -> Self {
		Self::Map(value)
	}
}

impl From<Set> for Value {
	fn from(value: Set) -> Self {
		Self::Set(value)
	}
}

impl From<MessageValue> for Value {
	fn from(value: MessageValue) -> Self {
		Self::Message(value)
	}
}

impl From<Instant> for Value {
	fn from(value: Instant) -> Self {
		Self::Date(value)
	}
}

impl From<Url> for Value {
	fn from(value: Url) -> Self {
		Self::Url(value)
	}
}

impl From<Bytes> for Value {
	fn from(value: Bytes) -> Self {
		Self::Bytes(value)
	}
}

impl From<Vec<u8>> for Value {
	fn from(value: Vec<u8>) -> Self {
		Self::Bytes(Bytes::from(value))
	}
}

impl From<Decimal> for Value {
	fn from(value: Decimal) -> Self {
		Self::Decimal(value)
	}
}

impl From<Rational> for Value {
	fn from(value: Rational) -> Self {
		Self::Rational(value)
	}
}

/// Typed extraction from a [`Value`], used by field reconstruction.
pub trait FromValue: Sized {
	/// Extract when the value has the matching variant.
	fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
	fn from_value(value: &Value) -> Option<Self> {
		Some(value.clone())
	}
}

impl FromValue for bool {
	fn from_value(value: &Value) -> Option<Self> {
		value.as_bool()
	}
}

impl FromValue for f64 {
	fn from_value(value: &Value) -> Option<Self> {
		value.as_f64()
	}
}

impl FromValue for String {
	fn from_value(value: &Value) -> Option<Self> {
		value.as_str().map(str::to_owned)
	}
}

impl FromValue for Arc<str> {
	fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::String(text) => Some(Arc::clone(text)),
			_ => None,
		}
	}
}

macro_rules! from_value_variant {
	($ty:ty, $variant:ident) => {
		impl FromValue for $ty {
			fn from_value(value: &Value) -> Option<Self> {
				match value {
					Value::$variant(inner) => Some(inner.clone()),
					_ => None,
				}
			}
		}
	};
}

from_value_variant!(BigInt, BigInt);
from_value_variant!(List, List);
from_value_variant!(Map, Map);
from_value_variant!(Set, Set);
from_value_variant!(MessageValue, Message);
from_value_variant!(Instant, Date);
from_value_variant!(Url, Url);
from_value_variant!(Bytes, Bytes);
from_value_variant!(Decimal, Decimal);
from_value_variant!(Rational, Rational);
