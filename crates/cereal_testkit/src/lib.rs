//! Shared test helpers and hand-written message types for workspace crates.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use cereal::model::{
	Decimal, FieldDescribable, FieldDescriptor, FieldEntries, FieldReconstructable, FieldSpec, FieldType, Instant, List, Map, Message,
	MessageType, MessageValue, Patch, Rational, Result, Set, Update, Value, decode_entries,
};
use num_bigint::BigInt;
use url::Url;

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// `{1: id, 3: value, 4: name}`: field 2 was retired.
#[derive(Debug, Clone, PartialEq)]
pub struct Hole {
	/// Field 1.
	pub id: f64,
	/// Field 3.
	pub value: f64,
	/// Field 4.
	pub name: String,
}

static HOLE_FIELDS: [FieldSpec; 3] = [
	FieldSpec::required("id", FieldType::Number),
	FieldSpec::required("value", FieldType::Number).numbered(3),
	FieldSpec::required("name", FieldType::String),
];

/// Schema of [`Hole`].
pub static HOLE: MessageType = MessageType::new("testkit.Hole", "Hole", &HOLE_FIELDS, decode_entries::<Hole>);

impl FieldDescribable for Hole {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		HOLE.describe([Some(Value::Number(self.id)), Some(Value::Number(self.value)), Some(Value::from(self.name.as_str()))])
	}
}

impl FieldReconstructable for Hole {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			id: entries.required("id")?,
			value: entries.required("value")?,
			name: entries.required("name")?,
		})
	}
}

impl Message for Hole {
	fn message_type() -> &'static MessageType {
		&HOLE
	}
}

/// `{id, created, note?, name}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dated {
	pub id: f64,
	pub created: Instant,
	pub note: Option<String>,
	pub name: String,
}

static DATED_FIELDS: [FieldSpec; 4] = [
	FieldSpec::required("id", FieldType::Number),
	FieldSpec::required("created", FieldType::Date),
	FieldSpec::optional("note", FieldType::String),
	FieldSpec::required("name", FieldType::String),
];

/// Schema of [`Dated`].
pub static DATED: MessageType = MessageType::new("testkit.Dated", "Dated", &DATED_FIELDS, decode_entries::<Dated>);

impl Dated {
	/// Copy with `note` kept, replaced, or cleared.
	pub fn with_note(&self, note: Update<Option<String>>) -> Result<Self> {
		self.set(&Patch::new().update("note", note.map(|note| note.map(Value::from))))
	}
}

impl FieldDescribable for Dated {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		DATED.describe([
			Some(Value::Number(self.id)),
			Some(Value::Date(self.created)),
			self.note.as_deref().map(Value::from),
			Some(Value::from(self.name.as_str())),
		])
	}
}

impl FieldReconstructable for Dated {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			id: entries.required("id")?,
			created: entries.required("created")?,
			note: entries.optional("note")?,
			name: entries.required("name")?,
		})
	}
}

impl Message for Dated {
	fn message_type() -> &'static MessageType {
		&DATED
	}
}

macro_rules! named_message {
	($(#[$doc:meta])* $ty:ident, $schema:ident, $fields:ident, $id:literal, $name:literal) => {
		$(#[$doc])*
		#[derive(Debug, Clone, PartialEq)]
		pub struct $ty {
			pub name: String,
		}

		static $fields: [FieldSpec; 1] = [FieldSpec::required("name", FieldType::String)];

		#[doc = concat!("Schema of [`", stringify!($ty), "`].")]
		pub static $schema: MessageType = MessageType::new($id, $name, &$fields, decode_entries::<$ty>);

		impl $ty {
			/// Instance with the given name.
			pub fn named(name: &str) -> Self {
				Self { name: name.to_owned() }
			}
		}

		impl FieldDescribable for $ty {
			fn field_descriptors(&self) -> Vec<FieldDescriptor> {
				$schema.describe([Some(Value::from(self.name.as_str()))])
			}
		}

		impl FieldReconstructable for $ty {
			fn from_entries(entries: &FieldEntries) -> Result<Self> {
				Ok(Self {
					name: entries.required("name")?,
				})
			}
		}

		impl Message for $ty {
			fn message_type() -> &'static MessageType {
				&$schema
			}
		}
	};
}

named_message!(
	/// `{name}`.
	Alpha, ALPHA, ALPHA_FIELDS, "testkit.Alpha", "Alpha"
);
named_message!(
	/// Same shape as [`Alpha`] under a different identity.
	Beta, BETA, BETA_FIELDS, "testkit.Beta", "Beta"
);
named_message!(
	/// Separate Rust type declaring the same identity as [`Alpha`], as a second copy of a generated module would.
	AlphaCopy, ALPHA_COPY, ALPHA_COPY_FIELDS, "testkit.Alpha", "Alpha"
);

/// `{id, note?}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gamma {
	pub id: f64,
	pub note: Option<String>,
}

static GAMMA_FIELDS: [FieldSpec; 2] = [FieldSpec::required("id", FieldType::Number), FieldSpec::optional("note", FieldType::String)];

/// Schema of [`Gamma`].
pub static GAMMA: MessageType = MessageType::new("testkit.Gamma", "Gamma", &GAMMA_FIELDS, decode_entries::<Gamma>);

impl FieldDescribable for Gamma {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		GAMMA.describe([Some(Value::Number(self.id)), self.note.as_deref().map(Value::from)])
	}
}

impl FieldReconstructable for Gamma {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			id: entries.required("id")?,
			note: entries.optional("note")?,
		})
	}
}

impl Message for Gamma {
	fn message_type() -> &'static MessageType {
		&GAMMA
	}
}

/// Single-field type written as `Z<label>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Zed {
	pub label: String,
}

static ZED_FIELDS: [FieldSpec; 1] = [FieldSpec::required("label", FieldType::String)];

/// Schema of [`Zed`], compact tag `Z`.
pub static ZED: MessageType = MessageType::compact("testkit.Zed", "Zed", &ZED_FIELDS, 'Z', decode_entries::<Zed>);

impl FieldDescribable for Zed {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		ZED.describe([Some(Value::from(self.label.as_str()))])
	}
}

impl FieldReconstructable for Zed {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			label: entries.required("label")?,
		})
	}
}

impl Message for Zed {
	fn message_type() -> &'static MessageType {
		&ZED
	}
}

/// Single-field type written as `N<text>`, whose payloads can collide with `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
	pub text: String,
}

static NOTE_FIELDS: [FieldSpec; 1] = [FieldSpec::required("text", FieldType::String)];

/// Schema of [`Note`], compact tag `N`.
pub static NOTE: MessageType = MessageType::compact("testkit.Note", "Note", &NOTE_FIELDS, 'N', decode_entries::<Note>);

impl FieldDescribable for Note {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		NOTE.describe([Some(Value::from(self.text.as_str()))])
	}
}

impl FieldReconstructable for Note {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			text: entries.required("text")?,
		})
	}
}

impl Message for Note {
	fn message_type() -> &'static MessageType {
		&NOTE
	}
}

static ALPHA_OR_BETA: [FieldType; 2] = [FieldType::Message(&ALPHA), FieldType::Message(&BETA)];

/// `{union: Alpha | Beta}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Holder {
	pub union: MessageValue,
}

static HOLDER_FIELDS: [FieldSpec; 1] = [FieldSpec::required("union", FieldType::Union(&ALPHA_OR_BETA))];

/// Schema of [`Holder`].
pub static HOLDER: MessageType = MessageType::new("testkit.Holder", "Holder", &HOLDER_FIELDS, decode_entries::<Holder>);

impl Holder {
	/// Holder around any message.
	pub fn new<T: Message>(member: T) -> Self {
		Self {
			union: MessageValue::new(member),
		}
	}
}

impl FieldDescribable for Holder {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		HOLDER.describe([Some(Value::Message(self.union.clone()))])
	}
}

impl FieldReconstructable for Holder {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			union: entries.required("union")?,
		})
	}
}

impl Message for Holder {
	fn message_type() -> &'static MessageType {
		&HOLDER
	}
}

static ZED_OR_STRING: [FieldType; 2] = [FieldType::Message(&ZED), FieldType::String];
static MARK: FieldType = FieldType::Union(&ZED_OR_STRING);

/// `{marks: list<Zed | string>}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
	pub marks: List,
}

static BADGE_FIELDS: [FieldSpec; 1] = [FieldSpec::required("marks", FieldType::List(&MARK))];

/// Schema of [`Badge`].
pub static BADGE: MessageType = MessageType::new("testkit.Badge", "Badge", &BADGE_FIELDS, decode_entries::<Badge>);

impl FieldDescribable for Badge {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		BADGE.describe([Some(Value::List(self.marks.clone()))])
	}
}

impl FieldReconstructable for Badge {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			marks: entries.required("marks")?,
		})
	}
}

impl Message for Badge {
	fn message_type() -> &'static MessageType {
		&BADGE
	}
}

static NUMBER_OR_CENTS: [FieldType; 2] = [FieldType::Number, FieldType::Decimal { precision: 10, scale: 2 }];
static CENTS_OR_NUMBER: [FieldType; 2] = [FieldType::Decimal { precision: 10, scale: 2 }, FieldType::Number];

/// `{first: number | decimal(10,2), second: decimal(10,2) | number}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
	pub first: Value,
	pub second: Value,
}

static READING_FIELDS: [FieldSpec; 2] = [
	FieldSpec::required("first", FieldType::Union(&NUMBER_OR_CENTS)),
	FieldSpec::required("second", FieldType::Union(&CENTS_OR_NUMBER)),
];

/// Schema of [`Reading`].
pub static READING: MessageType = MessageType::new("testkit.Reading", "Reading", &READING_FIELDS, decode_entries::<Reading>);

impl FieldDescribable for Reading {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		READING.describe([Some(self.first.clone()), Some(self.second.clone())])
	}
}

impl FieldReconstructable for Reading {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			first: entries.required("first")?,
			second: entries.required("second")?,
		})
	}
}

impl Message for Reading {
	fn message_type() -> &'static MessageType {
		&READING
	}
}

/// Every scalar wrapper and collection shape in one message.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
	pub amount: Decimal,
	pub ratio: Rational,
	pub count: Option<BigInt>,
	pub blob: Option<Bytes>,
	pub link: Option<Url>,
	pub tags: List,
	pub scores: Map,
	pub flags: Set,
	pub nested: Option<Hole>,
}

static LEDGER_FIELDS: [FieldSpec; 9] = [
	FieldSpec::required("amount", FieldType::Decimal { precision: 12, scale: 2 }),
	FieldSpec::required("ratio", FieldType::Rational),
	FieldSpec::optional("count", FieldType::BigInt),
	FieldSpec::optional("blob", FieldType::Bytes),
	FieldSpec::optional("link", FieldType::Url),
	FieldSpec::required("tags", FieldType::List(&FieldType::String)),
	FieldSpec::required("scores", FieldType::Map(&FieldType::String, &FieldType::Number)),
	FieldSpec::required("flags", FieldType::Set(&FieldType::String)),
	FieldSpec::optional("nested", FieldType::Message(&HOLE)).numbered(10),
];

/// Schema of [`Ledger`].
pub static LEDGER: MessageType = MessageType::new("testkit.Ledger", "Ledger", &LEDGER_FIELDS, decode_entries::<Ledger>);

impl FieldDescribable for Ledger {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		LEDGER.describe([
			Some(Value::Decimal(self.amount.clone())),
			Some(Value::Rational(self.ratio.clone())),
			self.count.clone().map(Value::BigInt),
			self.blob.clone().map(Value::Bytes),
			self.link.clone().map(Value::Url),
			Some(Value::List(self.tags.clone())),
			Some(Value::Map(self.scores.clone())),
			Some(Value::Set(self.flags.clone())),
			self.nested.clone().map(Message::into_value),
		])
	}
}

impl FieldReconstructable for Ledger {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			amount: entries.required("amount")?,
			ratio: entries.required("ratio")?,
			count: entries.optional("count")?,
			blob: entries.optional("blob")?,
			link: entries.optional("link")?,
			tags: entries.required("tags")?,
			scores: entries.required("scores")?,
			flags: entries.required("flags")?,
			nested: entries.optional_message("nested")?,
		})
	}
}

impl Message for Ledger {
	fn message_type() -> &'static MessageType {
		&LEDGER
	}
}
