mod codec;
mod coerce;
mod collections;
mod decimal;
mod error;
mod instant;
mod message;
mod node;
mod numeric;
mod rational;
mod reader;
mod schema;
pub mod structural;
mod union;
mod value;
mod writer;

/// Decode entry points and read options.
pub use codec::{ReadOptions, decode_message, deserialize_union, read_node};
/// Persistent collection types.
pub use collections::{List, Map, PersistentCollection, Set};
/// Fixed-point decimal.
pub use decimal::Decimal;
/// Error and result aliases.
pub use error::{CerealError, NumericError, ParseError, ParseErrorKind, Result, ValidationCode, ValidationError};
/// Millisecond UTC instant.
pub use instant::Instant;
/// Message runtime traits and helpers.
pub use message::{
	DynMessage, FieldDescribable, FieldDescriptor, FieldEntries, FieldKey, FieldReconstructable, Message, MessageValue, Patch, Update,
	decode_entries,
};
/// Untyped reader output and compact tag registry.
pub use node::{Entries, EntryKey, Node, RESERVED_TAGS, RawEntry, TagSet, is_compact_tag};
/// Rounding modes.
pub use numeric::{DEFAULT_ROUNDING, Rounding};
/// Reduced fraction.
pub use rational::Rational;
/// Schema declarations.
pub use schema::{DecodeFn, FieldSpec, FieldType, MAX_FIELD_NUMBER, MessageType, TypeIdentity};
/// Runtime value model.
pub use value::{FromValue, Value};
/// Canonical writer.
pub use writer::{is_safe_word, write_message, write_message_tagged, write_value};

#[cfg(test)]
mod fixtures;
