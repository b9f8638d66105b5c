use crate::cmd::test_support::{run_cereal, run_cereal_json, run_cereal_stdout};

#[test]
fn decimal_pads_to_scale() {
	assert_eq!(run_cereal_stdout(&["decimal", "5", "2", "1.5"]), "1.50\n");
	assert_eq!(run_cereal_stdout(&["decimal", "5", "2", "1/3"]), "0.33\n");
	assert_eq!(run_cereal_stdout(&["decimal", "5", "2", "-2"]), "-2.00\n");
}

#[test]
fn strict_decimal_rejects_non_canonical_text() {
	assert_eq!(run_cereal_stdout(&["decimal", "5", "2", "123.45", "--strict"]), "123.45\n");

	let output = run_cereal(&["decimal", "5", "2", "1.5", "--strict"]);
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.starts_with("error: "), "unexpected stderr: {stderr}");
}

#[test]
fn decimal_overflow_fails() {
	let output = run_cereal(&["decimal", "4", "2", "123.45"]);
	assert_eq!(output.status.code(), Some(1));
}

#[test]
fn decimal_json_reports_shape() {
	let json = run_cereal_json(&["decimal", "10", "3", "12.5", "--json"]);
	assert_eq!(json["canonical"], "12.500");
	assert_eq!(json["mantissa"], "12500");
	assert_eq!(json["precision"], 10);
	assert_eq!(json["scale"], 3);
}

#[test]
fn rational_is_reduced() {
	assert_eq!(run_cereal_stdout(&["rational", "2/4"]), "1/2\n");
	assert_eq!(run_cereal_stdout(&["rational", "-6/3"]), "-2\n");

	let json = run_cereal_json(&["rational", "10/-4", "--json"]);
	assert_eq!(json["numerator"], "-5");
	assert_eq!(json["denominator"], "2");
	assert_eq!(json["integer"], false);
}

#[test]
fn rational_zero_denominator_fails() {
	let output = run_cereal(&["rational", "1/0"]);
	assert_eq!(output.status.code(), Some(1));
}

#[test]
fn hash_matches_string_hash() {
	assert_eq!(run_cereal_stdout(&["hash", ""]), "0\n");
	assert_eq!(run_cereal_stdout(&["hash", "a"]), "97\n");
	assert_eq!(run_cereal_stdout(&["hash", "ab"]), "3105\n");
}
