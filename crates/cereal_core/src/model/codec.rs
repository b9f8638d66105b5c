use tracing::debug;

use crate::model::coerce::coerce_message;
use crate::model::node::{Node, TagSet};
use crate::model::reader::Reader;
use crate::model::union::resolve_union;
use crate::model::{FieldType, MessageType, MessageValue, Result, ValidationError, Value};

/// Read-side limits and validation switches.
#[derive(Debug, Clone)]
pub struct ReadOptions {
	/// Fill missing required fields with type defaults and ignore unknown fields.
	pub skip_validation: bool,
	/// Maximum container nesting depth.
	pub max_depth: u32,
}

impl Default for ReadOptions {
	fn default() -> Self {
		Self {
			skip_validation: false,
			max_depth: 64,
		}
	}
}

impl ReadOptions {
	/// Preset for payloads from a trusted producer: validation is skipped.
	pub fn trusted() -> Self {
		Self {
			skip_validation: true,
			..Self::default()
		}
	}
}

/// Parse cereal text into an untyped node tree.
///
/// `tags` lists the compact tags that may appear as `X"..."` literals.
pub fn read_node(text: &str, tags: &TagSet, opt: &ReadOptions) -> Result<Node> {
	Ok(Reader::new(text, tags, opt.max_depth).read_document()?)
}

/// Parse and reconstruct a message of type `ty`.
pub fn decode_message(ty: &'static MessageType, text: &str, opt: &ReadOptions) -> Result<MessageValue> {
	debug!(type_id = ty.id(), len = text.len(), skip_validation = opt.skip_validation, "decoding message");
	let node = read_node(text, ty.tag_set(), opt)?;
	coerce_message(&node, ty, opt, ty.name())
}

/// Parse a payload that may be any of `candidates`, resolving it like a union field.
pub fn deserialize_union(text: &str, candidates: &[&'static MessageType], opt: &ReadOptions) -> Result<MessageValue> {
	debug!(candidates = candidates.len(), len = text.len(), "decoding union payload");
	let mut tags = TagSet::new();
	for ty in candidates {
		tags.extend_from(ty.tag_set());
	}

	let node = read_node(text, &tags, opt)?;
	let members: Vec<FieldType> = candidates.iter().copied().map(FieldType::Message).collect();
	match resolve_union(&node, &members, opt, ROOT_PATH)? {
		Value::Message(message) => Ok(message),
		other => Err(ValidationError::type_mismatch(ROOT_PATH, "message", other.kind()).into()),
	}
}

const ROOT_PATH: &str = "$";
