use cereal::model::{EntryKey, Node, ReadOptions, read_node};
use serde_json::{Map, Value as JsonValue, json};

use crate::cmd::print::{PrintOptions, render_node};
use crate::cmd::util::{emit_json, parse_tags};

#[derive(clap::Args)]
pub struct Args {
	#[arg(allow_hyphen_values = true)]
	pub text: String,
	/// Compact tag letters to accept; every non-reserved letter when omitted.
	#[arg(long)]
	pub tags: Option<String>,
	#[arg(long)]
	pub json: bool,
	#[arg(long = "max-depth", default_value_t = 64)]
	pub max_depth: u32,
	#[arg(long = "max-items", default_value_t = 32)]
	pub max_items: usize,
}

/// Parse cereal text without a schema and print its node tree.
pub fn run(args: Args) -> cereal::model::Result<()> {
	let Args {
		text,
		tags,
		json,
		max_depth,
		max_items,
	} = args;

	let tags = parse_tags(tags.as_deref());
	let opt = ReadOptions {
		max_depth,
		..ReadOptions::default()
	};
	let node = read_node(&text, &tags, &opt)?;

	if json {
		emit_json(&node_to_json(&node));
		return Ok(());
	}

	let options = PrintOptions {
		max_items,
		..PrintOptions::default()
	};
	print!("{}", render_node(&node, options));
	Ok(())
}

pub(crate) fn node_to_json(node: &Node) -> JsonValue {
	let mut out = Map::new();
	out.insert("kind".to_owned(), json!(node.kind()));

	match node {
		Node::Null => {}
		Node::Bool(flag) => {
			out.insert("value".to_owned(), json!(flag));
		}
		Node::Number { text, .. } => {
			out.insert("value".to_owned(), json!(text));
		}
		Node::BigInt(value) => {
			out.insert("value".to_owned(), json!(value.to_string()));
		}
		Node::Str(text) | Node::Word(text) => {
			out.insert("value".to_owned(), json!(text));
		}
		Node::Date(instant) => {
			out.insert("value".to_owned(), json!(instant.to_string()));
		}
		Node::Url(url) => {
			out.insert("value".to_owned(), json!(url.as_str()));
		}
		Node::Bytes(bytes) => {
			let items: Vec<JsonValue> = bytes.iter().map(|byte| json!(byte)).collect();
			out.insert("value".to_owned(), JsonValue::Array(items));
		}
		Node::Rational(value) => {
			out.insert("value".to_owned(), json!(value.to_string()));
		}
		Node::List(items) | Node::Set(items) => {
			let items: Vec<JsonValue> = items.iter().map(node_to_json).collect();
			out.insert("items".to_owned(), JsonValue::Array(items));
		}
		Node::Map(pairs) => {
			let pairs: Vec<JsonValue> = pairs
				.iter()
				.map(|(key, value)| json!({ "key": node_to_json(key), "value": node_to_json(value) }))
				.collect();
			out.insert("pairs".to_owned(), JsonValue::Array(pairs));
		}
		Node::Object(entries) => {
			let entries: Vec<JsonValue> = entries
				.iter()
				.map(|entry| {
					let key = match &entry.key {
						EntryKey::Position => JsonValue::Null,
						EntryKey::Number(number) => json!(number),
						EntryKey::Name(name) => json!(name),
					};
					json!({ "key": key, "at": entry.at, "value": node_to_json(&entry.value) })
				})
				.collect();
			out.insert("entries".to_owned(), JsonValue::Array(entries));
		}
		Node::Tagged { type_name, payload } => {
			out.insert("type".to_owned(), json!(type_name));
			out.insert("value".to_owned(), node_to_json(payload));
		}
		Node::Compact { tag, payload } => {
			out.insert("tag".to_owned(), json!(tag.to_string()));
			out.insert("value".to_owned(), json!(payload));
		}
	}

	JsonValue::Object(out)
}

#[cfg(test)]
mod tests;
