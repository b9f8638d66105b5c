use std::collections::BTreeSet;

use bytes::Bytes;
use num_bigint::BigInt;
use url::Url;

use crate::model::{Instant, Rational};

/// Built-in tag letters that can never be registered as compact tags.
pub const RESERVED_TAGS: [char; 6] = ['B', 'D', 'M', 'Q', 'S', 'U'];

/// Whether `tag` may serve as a compact type tag.
pub const fn is_compact_tag(tag: char) -> bool {
	tag.is_ascii_uppercase() && !matches!(tag, 'B' | 'D' | 'M' | 'Q' | 'S' | 'U')
}

/// Compact tags the reader may accept in one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
	tags: BTreeSet<char>,
	any: bool,
}

impl TagSet {
	/// Empty set: every `X"..."` literal is an unknown tag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Accept every non-reserved uppercase letter, for schema-less inspection.
	pub fn any() -> Self {
		Self {
			tags: BTreeSet::new(),
			any: true,
		}
	}

	/// Register a tag; reserved or non-uppercase letters are ignored.
	pub fn insert(&mut self, tag: char) {
		if is_compact_tag(tag) {
			self.tags.insert(tag);
		}
	}

	/// Merge another set into this one.
	pub fn extend_from(&mut self, other: &Self) {
		self.any |= other.any;
		self.tags.extend(other.tags.iter().copied());
	}

	/// Whether `tag` may open a compact literal.
	pub fn contains(&self, tag: char) -> bool {
		if self.any {
			return is_compact_tag(tag);
		}
		self.tags.contains(&tag)
	}

	/// Explicitly registered tags in order.
	pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
		self.tags.iter().copied()
	}
}

impl FromIterator<char> for TagSet {
	fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
		let mut set = Self::new();
		for tag in iter {
			set.insert(tag);
		}
		set
	}
}

/// Untyped tree produced by the reader, before binding to a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	/// `null` or `undefined`.
	Null,
	/// `true` or `false`.
	Bool(bool),
	/// Number literal; `text` keeps the source spelling for exact decimal coercion.
	Number {
		/// Parsed double value.
		value: f64,
		/// Literal as written.
		text: String,
	},
	/// `123n`.
	BigInt(BigInt),
	/// Quoted string.
	Str(String),
	/// Bare word.
	Word(String),
	/// `D"..."`.
	Date(Instant),
	/// `U"..."`.
	Url(Url),
	/// `B"..."`.
	Bytes(Bytes),
	/// `Q<n>/<d>`.
	Rational(Rational),
	/// `[...]`.
	List(Vec<Node>),
	/// `S[...]`.
	Set(Vec<Node>),
	/// `M[[k,v],...]`.
	Map(Vec<(Node, Node)>),
	/// `{...}`.
	Object(Entries),
	/// `$Name<value>`.
	Tagged {
		/// Type name after `$`.
		type_name: String,
		/// Tagged value.
		payload: Box<Node>,
	},
	/// `X"..."` with a registered compact tag.
	Compact {
		/// Tag letter.
		tag: char,
		/// Unescaped payload text.
		payload: String,
	},
}

impl Node {
	/// Stable lowercase label used in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Number { .. } => "number",
			Self::BigInt(_) => "bigint",
			Self::Str(_) => "string",
			Self::Word(_) => "word",
			Self::Date(_) => "date",
			Self::Url(_) => "url",
			Self::Bytes(_) => "bytes",
			Self::Rational(_) => "rational",
			Self::List(_) => "list",
			Self::Set(_) => "set",
			Self::Map(_) => "map",
			Self::Object(_) => "object",
			Self::Tagged { .. } => "tagged",
			Self::Compact { .. } => "compact",
		}
	}
}

/// Object body: entries in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entries {
	/// Raw entries as read.
	pub entries: Vec<RawEntry>,
}

impl Entries {
	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the object is `{}`.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterate entries in source order.
	pub fn iter(&self) -> std::slice::Iter<'_, RawEntry> {
		self.entries.iter()
	}
}

/// One object entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
	/// How the entry addressed its field.
	pub key: EntryKey,
	/// Entry value.
	pub value: Node,
	/// Byte offset of the entry start.
	pub at: usize,
}

/// Field addressing forms inside an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKey {
	/// No key: one past the previous entry's field number.
	Position,
	/// `N:` prefix.
	Number(u32),
	/// `name:` prefix.
	Name(String),
}
