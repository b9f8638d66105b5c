use cereal::model::{ReadOptions, TagSet, read_node};

use crate::cmd::inspect::node_to_json;
use crate::cmd::print::{PrintOptions, render_node};
use crate::cmd::test_support::{run_cereal, run_cereal_json, run_cereal_stdout};

fn node(text: &str) -> cereal::model::Node {
	read_node(text, &TagSet::any(), &ReadOptions::default()).expect("text parses")
}

#[test]
fn tree_shows_entry_addressing() {
	let rendered = render_node(&node(":{20,3:42,name:Hole}"), PrintOptions::default());
	assert_eq!(rendered, "object len=3\n  + number 20\n  3: number 42\n  name: word Hole\n");
}

#[test]
fn tree_nests_maps_sets_and_tags() {
	let rendered = render_node(&node(r#":M[[a,S[1n]]]"#), PrintOptions::default());
	assert_eq!(rendered, "map len=1\n  [0] key word a\n  [0] value set len=1\n    [0] bigint 1\n");

	let rendered = render_node(&node(r#":[$Zed"hi",Z"a b"]"#), PrintOptions::default());
	assert_eq!(rendered, "list len=2\n  [0] tagged $Zed\n    string \"hi\"\n  [1] compact Z \"a b\"\n");
}

#[test]
fn tree_truncates_long_containers() {
	let options = PrintOptions { indent: 1, max_items: 2 };
	let rendered = render_node(&node(":[1,2,3,4]"), options);
	assert_eq!(rendered, "list len=4\n [0] number 1\n [1] number 2\n ... 2 more\n");
}

#[test]
fn json_tree_keeps_literal_text() {
	let json = node_to_json(&node(r#":{1.50,x:$Alpha{a},Z"b c",M[[1,2n]]}"#));
	assert_eq!(json["kind"], "object");
	let entries = json["entries"].as_array().expect("entries array");
	assert_eq!(entries[0]["key"], serde_json::Value::Null);
	assert_eq!(entries[0]["value"]["value"], "1.50");
	assert_eq!(entries[1]["key"], "x");
	assert_eq!(entries[1]["value"]["type"], "Alpha");
	assert_eq!(entries[2]["value"]["kind"], "compact");
	assert_eq!(entries[2]["value"]["tag"], "Z");
	assert_eq!(entries[3]["value"]["pairs"][0]["value"]["value"], "2");
}

#[test]
fn inspect_command_prints_json() {
	let json = run_cereal_json(&["inspect", ":[D\"2020-01-01T00:00:00.000Z\",B\"aGk=\"]", "--json"]);
	assert_eq!(json["kind"], "list");
	assert_eq!(json["items"][0]["value"], "2020-01-01T00:00:00.000Z");
	assert_eq!(json["items"][1]["value"], serde_json::json!([104, 105]));
}

#[test]
fn inspect_command_prints_tree() {
	assert_eq!(run_cereal_stdout(&["inspect", ":$Alpha{x}"]), "tagged $Alpha\n  object len=1\n    + word x\n");
}

#[test]
fn unregistered_tag_is_rejected_when_tags_given() {
	let output = run_cereal(&["inspect", ":Z\"x\"", "--tags", "Y"]);
	assert_eq!(output.status.code(), Some(1));
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("unknown tag 'Z'"), "unexpected stderr: {stderr}");
}

#[test]
fn depth_limit_is_configurable() {
	let output = run_cereal(&["inspect", ":[[[1]]]", "--max-depth", "2"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("nesting depth exceeded"));
}
