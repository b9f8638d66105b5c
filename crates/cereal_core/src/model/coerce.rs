use std::str::FromStr;

use num_bigint::BigInt;
use url::Url;

use crate::model::codec::ReadOptions;
use crate::model::node::{Entries, EntryKey, Node};
use crate::model::union::resolve_union;
use crate::model::{
	Decimal, FieldEntries, FieldType, Instant, List, Map, MessageType, MessageValue, ParseError, ParseErrorKind, Rational, Result, Set,
	ValidationError, Value,
};

/// Convert an untyped node into a value of the declared field type.
pub(crate) fn coerce(node: &Node, ty: &FieldType, opt: &ReadOptions, path: &str) -> Result<Value> {
	let value = match (ty, node) {
		(FieldType::Union(members), _) => return resolve_union(node, members, opt, path),
		(FieldType::Message(message_ty), _) => Value::Message(coerce_message(node, *message_ty, opt, path)?),
		(FieldType::Null, Node::Null) => Value::Null,
		(FieldType::Bool, Node::Bool(flag)) => Value::Bool(*flag),
		(FieldType::Number, Node::Number { value, .. }) => Value::Number(*value),
		(FieldType::BigInt, Node::BigInt(number)) => Value::BigInt(number.clone()),
		(FieldType::BigInt, Node::Number { text, .. }) => {
			Value::BigInt(BigInt::from_str(text).map_err(|_| ValidationError::type_mismatch(path, ty, text.as_str()))?)
		}
		(FieldType::String, Node::Str(text) | Node::Word(text)) => Value::from(text.as_str()),
		(FieldType::Date, Node::Date(instant)) => Value::Date(*instant),
		(FieldType::Url, Node::Url(url)) => Value::Url(url.clone()),
		(FieldType::Bytes, Node::Bytes(bytes)) => Value::Bytes(bytes.clone()),
		(FieldType::Rational, Node::Rational(rational)) => Value::Rational(rational.clone()),
		(FieldType::Decimal { precision, scale }, Node::Number { text, .. } | Node::Str(text)) => {
			Value::Decimal(decimal_from_text(*precision, *scale, text, path)?)
		}
		(FieldType::List(item), Node::List(items)) => Value::List(
			items
				.iter()
				.enumerate()
				.map(|(idx, node)| coerce(node, item, opt, &format!("{path}[{idx}]")))
				.collect::<Result<List>>()?,
		),
		(FieldType::Set(item), Node::Set(items)) => Value::Set(
			items
				.iter()
				.enumerate()
				.map(|(idx, node)| coerce(node, item, opt, &format!("{path}[{idx}]")))
				.collect::<Result<Set>>()?,
		),
		(FieldType::Map(key_ty, item_ty), Node::Map(pairs)) => Value::Map(
			pairs
				.iter()
				.enumerate()
				.map(|(idx, (key, item))| -> Result<(Value, Value)> {
					let entry_path = format!("{path}[{idx}]");
					Ok((coerce(key, key_ty, opt, &entry_path)?, coerce(item, item_ty, opt, &entry_path)?))
				})
				.collect::<Result<Map>>()?,
		),
		_ => return Err(ValidationError::type_mismatch(path, ty, node.kind()).into()),
	};
	Ok(value)
}

/// Convert a node into a message of type `ty`: object, `$Name` tag (`$Name"..."` for compact
/// types), or compact form.
pub(crate) fn coerce_message(node: &Node, ty: &'static MessageType, opt: &ReadOptions, path: &str) -> Result<MessageValue> {
	match node {
		Node::Object(entries) => {
			let bound = bind_entries(entries, ty, opt, path)?;
			ty.decode(&bound)
		}
		Node::Tagged { type_name, payload } if ty.matches_name(type_name) => match payload.as_ref() {
			Node::Str(text) if ty.compact_tag().is_some() => decode_compact(ty, text, opt, path),
			payload => coerce_message(payload, ty, opt, path),
		},
		Node::Compact { tag, payload } if ty.compact_tag() == Some(*tag) => decode_compact(ty, payload, opt, path),
		Node::Word(word) if ty.compact_tag().is_some() && word.chars().next() == ty.compact_tag() => {
			let payload = word.get(1..).unwrap_or_default();
			decode_compact(ty, payload, opt, path)
		}
		_ => Err(ValidationError::type_mismatch(path, FieldType::Message(ty), node.kind()).into()),
	}
}

/// Decode the payload text of a compact literal into its single field.
pub(crate) fn decode_compact(ty: &'static MessageType, payload: &str, opt: &ReadOptions, path: &str) -> Result<MessageValue> {
	let Some(spec) = ty.fields().first() else {
		return Err(ValidationError::type_mismatch(path, FieldType::Message(ty), "compact").into());
	};
	let field_path = format!("{path}.{}", spec.name);
	let value = coerce_text(payload, &spec.ty, &field_path)?;
	ty.decode(&FieldEntries::new(ty, vec![Some(value)], opt.skip_validation))
}

fn coerce_text(text: &str, ty: &FieldType, path: &str) -> Result<Value> {
	let mismatch = || ValidationError::type_mismatch(path, ty, text);
	Ok(match ty {
		FieldType::String => Value::from(text),
		FieldType::Number => Value::Number(match text {
			"NaN" => f64::NAN,
			"Infinity" => f64::INFINITY,
			"-Infinity" => f64::NEG_INFINITY,
			_ => text.parse::<f64>().map_err(|_| mismatch())?,
		}),
		FieldType::BigInt => Value::BigInt(BigInt::from_str(text).map_err(|_| mismatch())?),
		FieldType::Bool => match text {
			"true" => Value::Bool(true),
			"false" => Value::Bool(false),
			_ => return Err(mismatch().into()),
		},
		FieldType::Decimal { precision, scale } => Value::Decimal(decimal_from_text(*precision, *scale, text, path)?),
		FieldType::Rational => Value::Rational(Rational::from_string(text).map_err(|_| mismatch())?),
		FieldType::Date => Value::Date(Instant::parse_iso(text).ok_or_else(mismatch)?),
		FieldType::Url => Value::Url(Url::parse(text).map_err(|_| mismatch())?),
		_ => return Err(mismatch().into()),
	})
}

fn decimal_from_text(precision: u32, scale: u32, text: &str, path: &str) -> Result<Decimal> {
	Decimal::from_strict_string(precision, scale, text).map_err(|err| ValidationError::invalid_value(path, err.to_string(), text).into())
}

/// Bind object entries to the fields of `ty`.
///
/// A positional entry takes the number after the previous entry's; `N:` and `name:`
/// entries reset that counter to their own number.
pub(crate) fn bind_entries(entries: &Entries, ty: &'static MessageType, opt: &ReadOptions, path: &str) -> Result<FieldEntries> {
	let fields = ty.fields();
	let mut values: Vec<Option<Value>> = vec![None; fields.len()];
	let mut seen = vec![false; fields.len()];
	let mut previous = 0_u32;

	for entry in entries.iter() {
		let number = match &entry.key {
			EntryKey::Position => previous.saturating_add(1),
			EntryKey::Number(number) => *number,
			EntryKey::Name(name) => match ty.index_of(name).and_then(|idx| ty.field_number(idx)) {
				Some(number) => number,
				None if opt.skip_validation => continue,
				None => return Err(ValidationError::unknown_field(format!("{path}.{name}")).into()),
			},
		};
		previous = number;

		let Some(idx) = ty.index_of_number(number) else {
			if opt.skip_validation {
				continue;
			}
			return Err(ValidationError::unknown_field(format!("{path}.#{number}")).into());
		};
		let spec = &fields[idx];
		if seen[idx] {
			return Err(ParseError::new(
				entry.at,
				ParseErrorKind::DuplicateField {
					field: spec.name.to_owned(),
				},
			)
			.into());
		}
		seen[idx] = true;

		if spec.optional && matches!(entry.value, Node::Null) && !matches!(spec.ty, FieldType::Null) {
			continue;
		}
		let field_path = format!("{path}.{}", spec.name);
		values[idx] = Some(coerce(&entry.value, &spec.ty, opt, &field_path)?);
	}

	Ok(FieldEntries::new(ty, values, opt.skip_validation))
}

/// Whether `node` has the lexical shape of `ty`, without coercing it.
pub(crate) fn node_fits(ty: &FieldType, node: &Node) -> bool {
	match (ty, node) {
		(FieldType::Null, Node::Null)
		| (FieldType::Bool, Node::Bool(_))
		| (FieldType::Number, Node::Number { .. })
		| (FieldType::BigInt, Node::BigInt(_))
		| (FieldType::String, Node::Str(_) | Node::Word(_))
		| (FieldType::Date, Node::Date(_))
		| (FieldType::Url, Node::Url(_))
		| (FieldType::Bytes, Node::Bytes(_))
		| (FieldType::Rational, Node::Rational(_))
		| (FieldType::Decimal { .. }, Node::Number { .. })
		| (FieldType::List(_), Node::List(_))
		| (FieldType::Set(_), Node::Set(_))
		| (FieldType::Map(_, _), Node::Map(_)) => true,
		(FieldType::Union(members), node) => members.iter().any(|member| node_fits(member, node)),
		_ => false,
	}
}
