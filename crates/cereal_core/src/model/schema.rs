use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hasher;
use std::sync::OnceLock;

use bytes::Bytes;
use num_bigint::BigInt;
use tracing::debug;
use twox_hash::XxHash64;
use url::Url;

use crate::model::node::is_compact_tag;
use crate::model::{
	Decimal, FieldDescriptor, FieldEntries, Instant, List, Map, MessageValue, Rational, Result, Rounding, Set, TagSet, ValidationError,
	Value,
};

/// Highest addressable field number.
pub const MAX_FIELD_NUMBER: u32 = 536_870_911;

/// Declared shape of a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
	/// Always `null`.
	Null,
	/// Boolean.
	Bool,
	/// Double.
	Number,
	/// Arbitrary-precision integer.
	BigInt,
	/// Text.
	String,
	/// Millisecond instant.
	Date,
	/// URL.
	Url,
	/// Byte buffer.
	Bytes,
	/// Fixed-point decimal with declared precision and scale.
	Decimal {
		/// Total significant digits.
		precision: u32,
		/// Digits after the point.
		scale: u32,
	},
	/// Reduced fraction.
	Rational,
	/// Sequence of one element type.
	List(&'static FieldType),
	/// Set of one element type.
	Set(&'static FieldType),
	/// Map from key type to value type.
	Map(&'static FieldType, &'static FieldType),
	/// Nested message.
	Message(&'static MessageType),
	/// Polymorphic field: one of the listed members, in declaration order.
	Union(&'static [FieldType]),
}

impl FieldType {
	/// Whether `value` has this declared shape.
	pub fn accepts(&self, value: &Value) -> bool {
		match (self, value) {
			(Self::Null, Value::Null)
			| (Self::Bool, Value::Bool(_))
			| (Self::Number, Value::Number(_))
			| (Self::BigInt, Value::BigInt(_))
			| (Self::String, Value::String(_))
			| (Self::Date, Value::Date(_))
			| (Self::Url, Value::Url(_))
			| (Self::Bytes, Value::Bytes(_))
			| (Self::Rational, Value::Rational(_)) => true,
			(Self::Decimal { precision, scale }, Value::Decimal(decimal)) => decimal.scale() == *scale && decimal.precision() == *precision,
			(Self::List(item), Value::List(items)) => items.iter().all(|value| item.accepts(value)),
			(Self::Set(item), Value::Set(items)) => items.iter().all(|value| item.accepts(value)),
			(Self::Map(key, item), Value::Map(entries)) => entries.iter().all(|(k, v)| key.accepts(k) && item.accepts(v)),
			(Self::Message(ty), Value::Message(message)) => message.message_type().identity() == ty.identity(),
			(Self::Union(members), value) => members.iter().any(|member| member.accepts(value)),
			_ => false,
		}
	}

	/// `value` restated at this declared shape, if it fits.
	///
	/// Decimals with the declared scale move to the declared precision so a stored value
	/// equals what the reader rebuilds from its text.
	pub fn conform(&self, value: &Value) -> Option<Value> {
		match (self, value) {
			(Self::Decimal { precision, scale }, Value::Decimal(decimal)) if decimal.scale() == *scale => {
				decimal.rescale(*precision, *scale, Rounding::Exact).ok().map(Value::Decimal)
			}
			(Self::List(item), Value::List(items)) => items.iter().map(|value| item.conform(value)).collect::<Option<List>>().map(Value::List),
			(Self::Set(item), Value::Set(items)) => items.iter().map(|value| item.conform(value)).collect::<Option<Set>>().map(Value::Set),
			(Self::Map(key, item), Value::Map(entries)) => entries
				.iter()
				.map(|(k, v)| Some((key.conform(k)?, item.conform(v)?)))
				.collect::<Option<Map>>()
				.map(Value::Map),
			(Self::Union(members), value) if !self.accepts(value) => members.iter().find_map(|member| member.conform(value)),
			_ if self.accepts(value) => Some(value.clone()),
			_ => None,
		}
	}

	/// Value a required field takes when nothing was supplied.
	pub fn default_value(&self) -> Result<Value> {
		Ok(match self {
			Self::Null => Value::Null,
			Self::Bool => Value::Bool(false),
			Self::Number => Value::Number(0.0),
			Self::BigInt => Value::BigInt(BigInt::default()),
			Self::String => Value::from(""),
			Self::Date => Value::Date(Instant::EPOCH),
			Self::Url => Value::Url(Url::parse(DEFAULT_URL).map_err(|err| ValidationError::invalid_value("url", err.to_string(), DEFAULT_URL))?),
			Self::Bytes => Value::Bytes(Bytes::new()),
			Self::Decimal { precision, scale } => Value::Decimal(Decimal::zero(*precision, *scale)?),
			Self::Rational => Value::Rational(Rational::zero()),
			Self::List(_) => Value::List(List::new()),
			Self::Set(_) => Value::Set(Set::new()),
			Self::Map(_, _) => Value::Map(Map::new()),
			Self::Message(ty) => Value::Message(ty.default_value()?),
			Self::Union(members) => match members.first() {
				Some(first) => first.default_value()?,
				None => Value::Null,
			},
		})
	}

	/// Message types among a union's members, in declaration order.
	pub fn message_members(members: &[FieldType]) -> Vec<&'static MessageType> {
		members
			.iter()
			.filter_map(|member| match member {
				Self::Message(ty) => Some(*ty),
				_ => None,
			})
			.collect()
	}

	fn collect_tags(&self, seen: &mut BTreeSet<&'static str>, out: &mut TagSet) {
		match self {
			Self::List(item) | Self::Set(item) => item.collect_tags(seen, out),
			Self::Map(key, item) => {
				key.collect_tags(seen, out);
				item.collect_tags(seen, out);
			}
			Self::Message(ty) => ty.collect_tags(seen, out),
			Self::Union(members) => {
				for member in members.iter() {
					member.collect_tags(seen, out);
				}
			}
			_ => {}
		}
	}
}

const DEFAULT_URL: &str = "about:blank";

impl fmt::Display for FieldType {
	/// Canonical shape text, also fed into type hashes.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("null"),
			Self::Bool => f.write_str("bool"),
			Self::Number => f.write_str("number"),
			Self::BigInt => f.write_str("bigint"),
			Self::String => f.write_str("string"),
			Self::Date => f.write_str("date"),
			Self::Url => f.write_str("url"),
			Self::Bytes => f.write_str("bytes"),
			Self::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
			Self::Rational => f.write_str("rational"),
			Self::List(item) => write!(f, "list<{item}>"),
			Self::Set(item) => write!(f, "set<{item}>"),
			Self::Map(key, item) => write!(f, "map<{key},{item}>"),
			Self::Message(ty) => write!(f, "message({})", ty.id()),
			Self::Union(members) => {
				f.write_str("union<")?;
				for (idx, member) in members.iter().enumerate() {
					if idx > 0 {
						f.write_str("|")?;
					}
					write!(f, "{member}")?;
				}
				f.write_str(">")
			}
		}
	}
}

/// Schema-side declaration of one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
	/// Field name.
	pub name: &'static str,
	/// Declared number; `None` means one past the previous field.
	pub number: Option<u32>,
	/// Declared shape.
	pub ty: FieldType,
	/// Whether the field may be absent.
	pub optional: bool,
}

impl FieldSpec {
	/// Required field numbered after its predecessor.
	pub const fn required(name: &'static str, ty: FieldType) -> Self {
		Self {
			name,
			number: None,
			ty,
			optional: false,
		}
	}

	/// Optional field numbered after its predecessor.
	pub const fn optional(name: &'static str, ty: FieldType) -> Self {
		Self {
			name,
			number: None,
			ty,
			optional: true,
		}
	}

	/// Pin an explicit field number.
	pub const fn numbered(self, number: u32) -> Self {
		assert!(number >= 1 && number <= MAX_FIELD_NUMBER, "field number out of range");
		Self { number: Some(number), ..self }
	}
}

/// Schema identity: two message types are the same type iff identities match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeIdentity {
	/// Stable type id.
	pub type_id: &'static str,
	/// Hash over the canonical field list.
	pub type_hash: &'static str,
}

/// Builds a typed message from bound field entries.
pub type DecodeFn = fn(&FieldEntries) -> Result<MessageValue>;

/// Static descriptor of one message type, the runtime face of a schema declaration.
pub struct MessageType {
	id: &'static str,
	name: &'static str,
	fields: &'static [FieldSpec],
	compact_tag: Option<char>,
	decode: DecodeFn,
	type_hash: OnceLock<String>,
	default: OnceLock<MessageValue>,
	tags: OnceLock<TagSet>,
}

impl MessageType {
	/// Declare a message type.
	pub const fn new(id: &'static str, name: &'static str, fields: &'static [FieldSpec], decode: DecodeFn) -> Self {
		Self {
			id,
			name,
			fields,
			compact_tag: None,
			decode,
			type_hash: OnceLock::new(),
			default: OnceLock::new(),
			tags: OnceLock::new(),
		}
	}

	/// Declare a single-field compact type, written as `<tag><payload>`.
	pub const fn compact(id: &'static str, name: &'static str, fields: &'static [FieldSpec], tag: char, decode: DecodeFn) -> Self {
		assert!(is_compact_tag(tag), "compact tag must be an uppercase letter outside B D M Q S U");
		assert!(fields.len() == 1, "compact types have exactly one field");
		Self {
			id,
			name,
			fields,
			compact_tag: Some(tag),
			decode,
			type_hash: OnceLock::new(),
			default: OnceLock::new(),
			tags: OnceLock::new(),
		}
	}

	/// Stable type id.
	pub fn id(&self) -> &'static str {
		self.id
	}

	/// Type name used by `$Name` union tags.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Declared fields in order.
	pub fn fields(&self) -> &'static [FieldSpec] {
		self.fields
	}

	/// Compact tag, when declared.
	pub fn compact_tag(&self) -> Option<char> {
		self.compact_tag
	}

	/// Whether `name` refers to this type (tag name or id).
	pub fn matches_name(&self, name: &str) -> bool {
		self.name == name || self.id == name
	}

	/// Effective number of the field at `index`.
	pub fn field_number(&self, index: usize) -> Option<u32> {
		let mut previous = 0;
		for (idx, spec) in self.fields.iter().enumerate() {
			previous = spec.number.unwrap_or(previous + 1);
			if idx == index {
				return Some(previous);
			}
		}
		None
	}

	/// Index of the field named `name`.
	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.fields.iter().position(|spec| spec.name == name)
	}

	/// Index of the field whose effective number is `number`.
	pub fn index_of_number(&self, number: u32) -> Option<usize> {
		let mut previous = 0;
		for (idx, spec) in self.fields.iter().enumerate() {
			previous = spec.number.unwrap_or(previous + 1);
			if previous == number {
				return Some(idx);
			}
		}
		None
	}

	/// Pair each declared field with a value, in declaration order.
	pub fn describe<I>(&self, values: I) -> Vec<FieldDescriptor>
	where
		I: IntoIterator<Item = Option<Value>>,
	{
		self.fields
			.iter()
			.zip(values)
			.map(|(spec, value)| FieldDescriptor {
				name: spec.name,
				number: spec.number,
				value,
			})
			.collect()
	}

	/// Hex xxHash64 over the canonical field list.
	pub fn type_hash(&self) -> &str {
		self.type_hash.get_or_init(|| {
			let mut numbered: Vec<(u32, &FieldSpec)> =
				self.fields.iter().enumerate().filter_map(|(idx, spec)| self.field_number(idx).map(|number| (number, spec))).collect();
			numbered.sort_by_key(|(number, _)| *number);

			let canonical = numbered
				.iter()
				.map(|(number, spec)| format!("{number}:{}:{}:{}", spec.name, if spec.optional { "opt" } else { "req" }, spec.ty))
				.collect::<Vec<_>>()
				.join("|");

			let mut hasher = XxHash64::with_seed(0);
			hasher.write(canonical.as_bytes());
			format!("{:016x}", hasher.finish())
		})
	}

	/// Identity pair compared by `is_instance`.
	pub fn identity(&'static self) -> TypeIdentity {
		TypeIdentity {
			type_id: self.id,
			type_hash: self.type_hash(),
		}
	}

	/// Build a typed message from bound entries.
	pub fn decode(&self, entries: &FieldEntries) -> Result<MessageValue> {
		(self.decode)(entries)
	}

	/// Shared default instance, built from field defaults on first use.
	pub fn default_value(&'static self) -> Result<MessageValue> {
		if let Some(value) = self.default.get() {
			return Ok(value.clone());
		}

		let values = self
			.fields
			.iter()
			.map(|spec| if spec.optional { Ok(None) } else { spec.ty.default_value().map(Some) })
			.collect::<Result<Vec<_>>>()?;
		let built = self.decode(&FieldEntries::new(self, values, false))?;

		let stored = self.default.get_or_init(|| {
			debug!(type_id = self.id, "initialised default instance");
			built
		});
		Ok(stored.clone())
	}

	/// Compact tags reachable from this type's schema graph, itself included.
	pub fn tag_set(&'static self) -> &'static TagSet {
		self.tags.get_or_init(|| {
			let mut out = TagSet::new();
			self.collect_tags(&mut BTreeSet::new(), &mut out);
			out
		})
	}

	fn collect_tags(&'static self, seen: &mut BTreeSet<&'static str>, out: &mut TagSet) {
		if !seen.insert(self.id) {
			return;
		}
		if let Some(tag) = self.compact_tag {
			out.insert(tag);
		}
		for spec in self.fields {
			spec.ty.collect_tags(seen, out);
		}
	}
}

impl fmt::Debug for MessageType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MessageType")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("fields", &self.fields.len())
			.field("compact_tag", &self.compact_tag)
			.finish()
	}
}
