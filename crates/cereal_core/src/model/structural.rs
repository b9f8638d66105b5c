//! Recursive equality, ordering, and hashing over [`Value`] trees.
//!
//! Every container and message in the crate defines `Eq`, `Ord`, and `Hash` through these
//! functions, so nested maps, sets, and messages compare by content rather than identity.

use std::cmp::Ordering;

use crate::model::Value;
use crate::model::collections::PersistentCollection;
use crate::model::writer::number_text;

/// Fold UTF-16 code units with `hash = hash * 31 + unit`, wrapping at 32 bits.
pub fn hash31<I: IntoIterator<Item = u16>>(units: I) -> i32 {
	units.into_iter().fold(0_i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// [`hash31`] over the UTF-16 encoding of `text`.
pub fn hash_str(text: &str) -> i32 {
	hash31(text.encode_utf16())
}

/// Order-dependent combination of element hashes.
pub(crate) fn combine_ordered<I: IntoIterator<Item = i32>>(hashes: I) -> i32 {
	hashes.into_iter().fold(1_i32, |hash, item| hash.wrapping_mul(31).wrapping_add(item))
}

/// Order-independent combination of element hashes.
pub(crate) fn combine_unordered<I: IntoIterator<Item = i32>>(hashes: I) -> i32 {
	hashes.into_iter().fold(0_i32, i32::wrapping_add)
}

/// Structural hash: equal values always hash equal.
pub fn structural_hash(value: &Value) -> i32 {
	match value {
		Value::Null => 0,
		Value::Bool(true) => 1231,
		Value::Bool(false) => 1237,
		Value::Number(number) => hash_str(&number_text(*number)),
		Value::BigInt(number) => hash_str(&number.to_string()).wrapping_add(BIGINT_SEED),
		Value::String(text) => hash_str(text),
		Value::List(items) => items.hash_code(),
		Value::Map(entries) => entries.hash_code(),
		Value::Set(items) => items.hash_code(),
		Value::Message(message) => message.hash_code(),
		Value::Date(instant) => {
			let millis = instant.unix_millis();
			(millis ^ (millis >> 32)) as i32
		}
		Value::Url(url) => hash_str(url.as_str()),
		Value::Bytes(bytes) => combine_ordered(bytes.iter().map(|byte| i32::from(*byte))),
		Value::Decimal(decimal) => hash_str(&decimal.to_string()),
		Value::Rational(rational) => hash_str(&rational.to_string()).wrapping_add(RATIONAL_SEED),
	}
}

const BIGINT_SEED: i32 = 0x6e;
const RATIONAL_SEED: i32 = 0x51;

/// Structural equality.
pub fn structural_eq(left: &Value, right: &Value) -> bool {
	structural_cmp(left, right) == Ordering::Equal
}

/// Total structural order: variant rank first, then content.
pub fn structural_cmp(left: &Value, right: &Value) -> Ordering {
	match (left, right) {
		(Value::Null, Value::Null) => Ordering::Equal,
		(Value::Bool(a), Value::Bool(b)) => a.cmp(b),
		(Value::Number(a), Value::Number(b)) => a.total_cmp(b),
		(Value::BigInt(a), Value::BigInt(b)) => a.cmp(b),
		(Value::String(a), Value::String(b)) => a.cmp(b),
		(Value::List(a), Value::List(b)) => a.cmp(b),
		(Value::Map(a), Value::Map(b)) => a.cmp(b),
		(Value::Set(a), Value::Set(b)) => a.cmp(b),
		(Value::Message(a), Value::Message(b)) => a.cmp(b),
		(Value::Date(a), Value::Date(b)) => a.cmp(b),
		(Value::Url(a), Value::Url(b)) => a.cmp(b),
		(Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
		(Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
		(Value::Rational(a), Value::Rational(b)) => a.cmp(b),
		_ => rank(left).cmp(&rank(right)),
	}
}

fn rank(value: &Value) -> u8 {
	match value {
		Value::Null => 0,
		Value::Bool(_) => 1,
		Value::Number(_) => 2,
		Value::BigInt(_) => 3,
		Value::Decimal(_) => 4,
		Value::Rational(_) => 5,
		Value::String(_) => 6,
		Value::Date(_) => 7,
		Value::Url(_) => 8,
		Value::Bytes(_) => 9,
		Value::List(_) => 10,
		Value::Set(_) => 11,
		Value::Map(_) => 12,
		Value::Message(_) => 13,
	}
}
