use cereal::model::{TagSet, is_compact_tag};
use tracing::warn;

/// Pretty-print a JSON payload on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to encode json: {err}"),
	}
}

/// Build the compact tag set for `--tags`; `None` accepts every tag letter.
pub(crate) fn parse_tags(tags: Option<&str>) -> TagSet {
	let Some(tags) = tags else {
		return TagSet::any();
	};

	let mut set = TagSet::new();
	for tag in tags.chars() {
		if is_compact_tag(tag) {
			set.insert(tag);
		} else {
			warn!(tag = %tag, "ignoring letter that cannot be a compact tag");
		}
	}
	set
}

/// Render text for single-line output, escaping control characters.
pub(crate) fn quoted(text: &str) -> String {
	format!("{text:?}")
}
