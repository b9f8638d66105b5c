use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::model::{FieldDescriptor, FieldType, MessageType, Value};

const KEYWORDS: [&str; 6] = ["true", "false", "null", "undefined", "NaN", "Infinity"];

/// Canonical text of a message: `:` then its object (or compact) form.
pub fn write_message(ty: &MessageType, descriptors: &[FieldDescriptor]) -> String {
	let mut out = String::from(":");
	write_message_body(&mut out, ty, descriptors, false);
	out
}

/// Like [`write_message`], carrying the `$Name` tag unless the type is compact.
pub fn write_message_tagged(ty: &MessageType, descriptors: &[FieldDescriptor]) -> String {
	let mut out = String::from(":");
	write_message_body(&mut out, ty, descriptors, true);
	out
}

/// Text of a value without schema guidance: strings bare when safe, messages untagged.
pub fn write_value(value: &Value) -> String {
	let mut out = String::from(":");
	write_typed(&mut out, value, None);
	out
}

/// JavaScript-style rendering of a double.
pub(crate) fn number_text(value: f64) -> String {
	if value.is_nan() {
		"NaN".to_owned()
	} else if value.is_infinite() {
		if value > 0.0 { "Infinity".to_owned() } else { "-Infinity".to_owned() }
	} else if value == 0.0 && value.is_sign_negative() {
		"-0".to_owned()
	} else {
		format!("{value}")
	}
}

/// Whether `text` can be written without quotes and read back as the same string.
pub fn is_safe_word(text: &str) -> bool {
	let bytes = text.as_bytes();
	let Some(&first) = bytes.first() else {
		return false;
	};
	if !(first.is_ascii_alphabetic() || first == b'_') {
		return false;
	}
	if !bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'_') {
		return false;
	}
	if KEYWORDS.contains(&text) {
		return false;
	}
	!(first == b'Q' && bytes.get(1).is_some_and(u8::is_ascii_digit))
}

fn write_message_body(out: &mut String, ty: &MessageType, descriptors: &[FieldDescriptor], tagged: bool) {
	if let Some(tag) = ty.compact_tag() {
		write_compact(out, tag, descriptors);
		return;
	}
	if tagged {
		out.push('$');
		out.push_str(ty.name());
	}

	out.push('{');
	let mut declared = 0;
	let mut written = 0;
	for (idx, descriptor) in descriptors.iter().enumerate() {
		declared = descriptor.number.unwrap_or(declared + 1);
		let Some(value) = &descriptor.value else {
			continue;
		};
		if written > 0 {
			out.push(',');
		}
		if declared != written + 1 {
			out.push_str(&format!("{declared}:"));
		}
		written = declared;

		let field_ty = field_type(ty, idx, descriptor.name);
		write_typed(out, value, field_ty.as_ref());
	}
	out.push('}');
}

fn field_type(ty: &MessageType, idx: usize, name: &str) -> Option<FieldType> {
	let fields = ty.fields();
	fields
		.get(idx)
		.filter(|spec| spec.name == name)
		.or_else(|| ty.index_of(name).map(|found| &fields[found]))
		.map(|spec| spec.ty)
}

fn write_compact(out: &mut String, tag: char, descriptors: &[FieldDescriptor]) {
	out.push(tag);
	let payload = descriptors.first().and_then(|descriptor| descriptor.value.as_ref()).map(compact_payload).unwrap_or_default();
	let spelled = format!("{tag}{payload}");
	if !payload.is_empty() && payload.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') && !KEYWORDS.contains(&spelled.as_str()) {
		out.push_str(&payload);
	} else {
		write_quoted(out, &payload);
	}
}

fn compact_payload(value: &Value) -> String {
	match value {
		Value::String(text) => text.to_string(),
		Value::Number(number) => number_text(*number),
		Value::Bool(flag) => flag.to_string(),
		Value::BigInt(number) => number.to_string(),
		Value::Decimal(decimal) => decimal.to_string(),
		Value::Rational(rational) => rational.to_string(),
		Value::Date(instant) => instant.to_string(),
		Value::Url(url) => url.as_str().to_owned(),
		Value::Bytes(bytes) => STANDARD.encode(bytes),
		other => {
			let mut out = String::new();
			write_typed(&mut out, other, None);
			out
		}
	}
}

fn write_typed(out: &mut String, value: &Value, ty: Option<&FieldType>) {
	if let Some(FieldType::Union(members)) = ty {
		write_union(out, value, members);
		return;
	}

	match value {
		Value::Null => out.push_str("null"),
		Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
		Value::Number(number) => out.push_str(&number_text(*number)),
		Value::BigInt(number) => out.push_str(&format!("{number}n")),
		Value::String(text) => write_string(out, text),
		Value::List(items) => {
			let item_ty = match ty {
				Some(FieldType::List(item)) => Some(*item),
				_ => None,
			};
			write_items(out, "[", items.iter(), item_ty);
		}
		Value::Set(items) => {
			let item_ty = match ty {
				Some(FieldType::Set(item)) => Some(*item),
				_ => None,
			};
			write_items(out, "S[", items.iter(), item_ty);
		}
		Value::Map(entries) => {
			let (key_ty, item_ty) = match ty {
				Some(FieldType::Map(key, item)) => (Some(*key), Some(*item)),
				_ => (None, None),
			};
			out.push_str("M[");
			for (idx, (key, item)) in entries.iter().enumerate() {
				if idx > 0 {
					out.push(',');
				}
				out.push('[');
				write_typed(out, key, key_ty);
				out.push(',');
				write_typed(out, item, item_ty);
				out.push(']');
			}
			out.push(']');
		}
		Value::Message(message) => write_message_body(out, message.message_type(), &message.descriptors(), false),
		Value::Date(instant) => {
			out.push('D');
			write_quoted(out, &instant.to_string());
		}
		Value::Url(url) => {
			out.push('U');
			write_quoted(out, url.as_str());
		}
		Value::Bytes(bytes) => {
			out.push('B');
			write_quoted(out, &STANDARD.encode(bytes));
		}
		Value::Decimal(decimal) => out.push_str(&decimal.to_string()),
		Value::Rational(rational) => out.push_str(&format!("Q{rational}")),
	}
}

fn write_items<'v>(out: &mut String, open: &str, items: impl Iterator<Item = &'v Value>, item_ty: Option<&FieldType>) {
	out.push_str(open);
	for (idx, item) in items.enumerate() {
		if idx > 0 {
			out.push(',');
		}
		write_typed(out, item, item_ty);
	}
	out.push(']');
}

fn write_union(out: &mut String, value: &Value, members: &[FieldType]) {
	let messages = FieldType::message_members(members);
	match value {
		Value::Message(message) => {
			let tagged = messages.len() > 1;
			write_message_body(out, message.message_type(), &message.descriptors(), tagged);
		}
		Value::String(text) if messages.iter().any(|ty| ty.compact_tag().is_some()) => write_quoted(out, text),
		// A bare literal would go to the `number` member.
		Value::Decimal(decimal) if members.iter().any(|member| matches!(member, FieldType::Number)) => {
			write_quoted(out, &decimal.to_string());
		}
		_ => {
			let member = members.iter().find(|member| member.accepts(value));
			write_typed(out, value, member);
		}
	}
}

fn write_string(out: &mut String, text: &str) {
	if is_safe_word(text) {
		out.push_str(text);
	} else {
		write_quoted(out, text);
	}
}

fn write_quoted(out: &mut String, text: &str) {
	out.push('"');
	for ch in text.chars() {
		match ch {
			'"' => out.push_str("\\\""),
			'\\' => out.push_str("\\\\"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			'\u{8}' => out.push_str("\\b"),
			'\u{c}' => out.push_str("\\f"),
			ch if u32::from(ch) < 0x20 => out.push_str(&format!("\\u{:04x}", u32::from(ch))),
			ch => out.push(ch),
		}
	}
	out.push('"');
}
