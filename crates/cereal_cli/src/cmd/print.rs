use cereal::model::{EntryKey, Node};

use crate::cmd::util::quoted;

/// Output truncation limits for node trees.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Spaces per nesting level.
	pub indent: usize,
	/// Maximum children printed for one container.
	pub max_items: usize,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self { indent: 2, max_items: 32 }
	}
}

/// Render `node` as an indented tree, one node per line.
pub fn render_node(node: &Node, options: PrintOptions) -> String {
	let mut out = String::new();
	write_node(&mut out, node, "", 0, options);
	out
}

fn write_node(out: &mut String, node: &Node, label: &str, depth: usize, options: PrintOptions) {
	let pad = " ".repeat(depth * options.indent);
	let head = match node {
		Node::Null => "null".to_owned(),
		Node::Bool(flag) => format!("bool {flag}"),
		Node::Number { text, .. } => format!("number {text}"),
		Node::BigInt(value) => format!("bigint {value}"),
		Node::Str(text) => format!("string {}", quoted(text)),
		Node::Word(word) => format!("word {word}"),
		Node::Date(instant) => format!("date {instant}"),
		Node::Url(url) => format!("url {url}"),
		Node::Bytes(bytes) => format!("bytes len={}", bytes.len()),
		Node::Rational(value) => format!("rational {value}"),
		Node::Compact { tag, payload } => format!("compact {tag} {}", quoted(payload)),
		Node::Tagged { type_name, .. } => format!("tagged ${type_name}"),
		Node::List(items) | Node::Set(items) => format!("{} len={}", node.kind(), items.len()),
		Node::Map(pairs) => format!("map len={}", pairs.len()),
		Node::Object(entries) => format!("object len={}", entries.len()),
	};
	out.push_str(&format!("{pad}{label}{head}\n"));

	match node {
		Node::Tagged { payload, .. } => write_node(out, payload, "", depth + 1, options),
		Node::List(items) | Node::Set(items) => {
			for (idx, item) in items.iter().take(options.max_items).enumerate() {
				write_node(out, item, &format!("[{idx}] "), depth + 1, options);
			}
			write_truncated(out, items.len(), depth + 1, options);
		}
		Node::Map(pairs) => {
			for (idx, (key, value)) in pairs.iter().take(options.max_items).enumerate() {
				write_node(out, key, &format!("[{idx}] key "), depth + 1, options);
				write_node(out, value, &format!("[{idx}] value "), depth + 1, options);
			}
			write_truncated(out, pairs.len(), depth + 1, options);
		}
		Node::Object(entries) => {
			for entry in entries.iter().take(options.max_items) {
				write_node(out, &entry.value, &entry_label(&entry.key), depth + 1, options);
			}
			write_truncated(out, entries.len(), depth + 1, options);
		}
		_ => {}
	}
}

fn entry_label(key: &EntryKey) -> String {
	match key {
		EntryKey::Position => "+ ".to_owned(),
		EntryKey::Number(number) => format!("{number}: "),
		EntryKey::Name(name) => format!("{name}: "),
	}
}

fn write_truncated(out: &mut String, len: usize, depth: usize, options: PrintOptions) {
	if len > options.max_items {
		let pad = " ".repeat(depth * options.indent);
		out.push_str(&format!("{pad}... {} more\n", len - options.max_items));
	}
}
