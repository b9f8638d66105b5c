//! Recovering the concrete member of a union field at read time.
//!
//! Tagged payloads (`$Name{...}`, compact literals) name their member directly.
//! Untagged objects are matched structurally against every message member and must
//! select exactly one; scalars go to the first member whose lexical shape fits, with
//! decimals kept apart from `number` and `string` members.

use std::collections::BTreeSet;

use tracing::trace;

use crate::model::codec::ReadOptions;
use crate::model::coerce::{coerce, coerce_message, decode_compact, node_fits};
use crate::model::node::{Entries, EntryKey, Node};
use crate::model::{CerealError, FieldType, MessageType, Result, ValidationError, Value};

/// Resolve `node` against the members of a union field.
pub(crate) fn resolve_union(node: &Node, members: &[FieldType], opt: &ReadOptions, path: &str) -> Result<Value> {
	let messages = FieldType::message_members(members);

	match node {
		Node::Tagged { type_name, .. } => {
			let ty = messages
				.iter()
				.copied()
				.find(|ty| ty.matches_name(type_name))
				.ok_or_else(|| unknown_member(path, type_name))?;
			trace!(field = path, member = ty.name(), "union resolved by type tag");
			return Ok(Value::Message(coerce_message(node, ty, opt, path)?));
		}
		Node::Compact { tag, payload } => {
			let ty = by_compact_tag(&messages, *tag).ok_or_else(|| unknown_member(path, &tag.to_string()))?;
			trace!(field = path, member = ty.name(), "union resolved by compact tag");
			return Ok(Value::Message(decode_compact(ty, payload, opt, path)?));
		}
		Node::Word(word) if messages.iter().any(|ty| ty.compact_tag().is_some()) => {
			let ty = word
				.chars()
				.next()
				.and_then(|tag| by_compact_tag(&messages, tag))
				.ok_or_else(|| unknown_member(path, word))?;
			trace!(field = path, member = ty.name(), "union resolved by bare compact word");
			return Ok(Value::Message(coerce_message(node, ty, opt, path)?));
		}
		Node::Object(entries) => return resolve_object(node, entries, &messages, opt, path),
		_ => {}
	}

	resolve_scalar(node, members, opt, path)
}

/// First member, in declaration order, that takes the scalar.
///
/// A bare number goes to a decimal member only when no `number` member exists, and a
/// quoted string only when no `string` member exists; a decimal member whose strict
/// parse fails passes the node on to the next member.
fn resolve_scalar(node: &Node, members: &[FieldType], opt: &ReadOptions, path: &str) -> Result<Value> {
	let has_number = members.iter().any(|member| matches!(member, FieldType::Number));
	let has_text = members.iter().any(|member| matches!(member, FieldType::String));
	let mut decimal_err = None;

	for member in members {
		let fits = match (member, node) {
			(FieldType::Decimal { .. }, Node::Number { .. }) => !has_number,
			(FieldType::Decimal { .. }, Node::Str(_)) => !has_text,
			_ => node_fits(member, node),
		};
		if !fits {
			continue;
		}
		match coerce(node, member, opt, path) {
			Err(err) if matches!(member, FieldType::Decimal { .. }) => {
				decimal_err.get_or_insert(err);
			}
			result => return result,
		}
	}

	Err(decimal_err.unwrap_or_else(|| ValidationError::type_mismatch(path, union_label(members), node.kind()).into()))
}

fn resolve_object(node: &Node, entries: &Entries, messages: &[&'static MessageType], opt: &ReadOptions, path: &str) -> Result<Value> {
	let ty = match messages {
		[] => return Err(ValidationError::type_mismatch(path, "message", node.kind()).into()),
		[only] => *only,
		_ => {
			let matches: Vec<&'static MessageType> = messages.iter().copied().filter(|ty| structurally_matches(entries, ty)).collect();
			let [only] = matches.as_slice() else {
				let listed = if matches.is_empty() { messages } else { matches.as_slice() };
				return Err(CerealError::AmbiguousUnion {
					field: path.to_owned(),
					candidates: listed.iter().map(|ty| ty.name().to_owned()).collect(),
				});
			};
			trace!(field = path, member = only.name(), "union resolved structurally");
			*only
		}
	};
	Ok(Value::Message(coerce_message(node, ty, opt, path)?))
}

/// Every entry addresses a declared field and every required field is covered.
fn structurally_matches(entries: &Entries, ty: &MessageType) -> bool {
	let mut previous = 0_u32;
	let mut covered = BTreeSet::new();
	for entry in entries.iter() {
		let idx = match &entry.key {
			EntryKey::Position => ty.index_of_number(previous.saturating_add(1)),
			EntryKey::Number(number) => ty.index_of_number(*number),
			EntryKey::Name(name) => ty.index_of(name),
		};
		let Some(number) = idx.and_then(|idx| ty.field_number(idx)) else {
			return false;
		};
		previous = number;
		covered.insert(number);
	}

	ty.fields()
		.iter()
		.enumerate()
		.all(|(idx, spec)| spec.optional || ty.field_number(idx).is_some_and(|number| covered.contains(&number)))
}

fn union_label(members: &[FieldType]) -> String {
	let labels: Vec<String> = members.iter().map(ToString::to_string).collect();
	format!("union<{}>", labels.join("|"))
}

fn by_compact_tag(messages: &[&'static MessageType], tag: char) -> Option<&'static MessageType> {
	messages.iter().copied().find(|ty| ty.compact_tag() == Some(tag))
}

fn unknown_member(path: &str, type_name: &str) -> CerealError {
	CerealError::UnknownUnionType {
		field: path.to_owned(),
		type_name: type_name.to_owned(),
	}
}
