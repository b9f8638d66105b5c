#![allow(missing_docs)]

use std::thread;

use bytes::Bytes;
use cereal::model::{Decimal, Instant, List, Map, Message, MessageType, Patch, Rational, Set, Value};
use cereal_testkit::{Alpha, Badge, Beta, DATED, Dated, HOLE, Holder, Hole, Ledger, Note, Reading, Zed};
use num_bigint::BigInt;
use proptest::prelude::*;
use url::Url;

/// Round trip, canonical stability, and equality/hash agreement for one value.
fn check_round_trip<T: Message + PartialEq>(value: &T) -> Result<(), TestCaseError> {
	let text = value.serialize();
	let parsed = T::deserialize(&text).map_err(|err| TestCaseError::fail(format!("{text}: {err}")))?;
	prop_assert_eq!(&parsed, value);
	prop_assert_eq!(parsed.serialize(), text);
	prop_assert!(parsed.equals(value));
	prop_assert_eq!(parsed.hash_code(), value.hash_code());
	Ok(())
}

fn instant_strategy() -> impl Strategy<Value = Instant> {
	(-62_167_219_200_000_i64..253_402_300_799_999_i64).prop_map(|millis| Instant::from_unix_millis(millis).expect("millis within years 0..=9999"))
}

fn dated_strategy() -> impl Strategy<Value = Dated> {
	(-1.0e15_f64..1.0e15_f64, instant_strategy(), proptest::option::of("\\PC{0,12}"), "\\PC{0,12}").prop_map(|(id, created, note, name)| Dated {
		id,
		created,
		note,
		name,
	})
}

fn hole_strategy() -> impl Strategy<Value = Hole> {
	(-1.0e9_f64..1.0e9_f64, -1.0e9_f64..1.0e9_f64, "\\PC{0,8}").prop_map(|(id, value, name)| Hole { id, value, name })
}

fn url_strategy() -> impl Strategy<Value = Url> {
	("[a-z]{1,8}", "[a-z0-9]{0,8}").prop_map(|(host, path)| Url::parse(&format!("https://{host}.example/{path}")).expect("generated url parses"))
}

fn ledger_strategy() -> impl Strategy<Value = Ledger> {
	let scalars = (
		-999_999_999_999_i64..999_999_999_999_i64,
		(-1000_i64..1000, 1_i64..1000),
		proptest::option::of(any::<i64>()),
		proptest::option::of(proptest::collection::vec(any::<u8>(), 0..16)),
		proptest::option::of(url_strategy()),
	);
	let collections = (
		proptest::collection::vec("\\PC{0,8}", 0..4),
		proptest::collection::vec(("\\PC{0,6}", -1.0e9_f64..1.0e9_f64), 0..4),
		proptest::collection::vec("[a-z]{0,6}", 0..4),
		proptest::option::of(hole_strategy()),
	);
	(scalars, collections).prop_map(|((amount, (numer, denom), count, blob, link), (tags, scores, flags, nested))| Ledger {
		amount: Decimal::new(amount.into(), 12, 2).expect("twelve digits fit"),
		ratio: Rational::from_ints(numer, denom).expect("positive denominator"),
		count: count.map(BigInt::from),
		blob: blob.map(Bytes::from),
		link,
		tags: tags.into_iter().map(Value::from).collect::<List>(),
		scores: scores.into_iter().map(|(key, score)| (Value::from(key), Value::from(score))).collect::<Map>(),
		flags: flags.into_iter().map(Value::from).collect::<Set>(),
		nested,
	})
}

fn holder_strategy() -> impl Strategy<Value = Holder> {
	prop_oneof![
		"\\PC{0,8}".prop_map(|name| Holder::new(Alpha::named(&name))),
		"\\PC{0,8}".prop_map(|name| Holder::new(Beta::named(&name))),
	]
}

fn badge_strategy() -> impl Strategy<Value = Badge> {
	let mark = prop_oneof![
		"\\PC{0,8}".prop_map(Value::from),
		"\\PC{0,8}".prop_map(|label| Zed { label }.into_value()),
	];
	proptest::collection::vec(mark, 0..5).prop_map(|marks| Badge { marks: List::from(marks) })
}

fn reading_member() -> impl Strategy<Value = Value> {
	prop_oneof![
		(-1.0e6_f64..1.0e6_f64).prop_map(Value::from),
		(-9_999_999_999_i64..9_999_999_999_i64).prop_map(|mantissa| Value::Decimal(Decimal::new(mantissa.into(), 10, 2).expect("ten digits fit"))),
	]
}

fn note_strategy() -> impl Strategy<Value = Note> {
	prop_oneof![Just("aN".to_owned()), "[a-zA-Z]{0,4}", "\\PC{0,6}"].prop_map(|text| Note { text })
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(512))]

	#[test]
	fn dated_round_trips(value in dated_strategy()) {
		let text = value.serialize();
		let parsed = Dated::deserialize(&text).expect("written text reads back");
		prop_assert_eq!(&parsed, &value);
		prop_assert_eq!(parsed.serialize(), text);
		prop_assert!(parsed.equals(&value));
		prop_assert_eq!(parsed.hash_code(), value.hash_code());
	}

	#[test]
	fn ledger_round_trips(value in ledger_strategy()) {
		check_round_trip(&value)?;
	}

	#[test]
	fn narrower_amounts_round_trip(value in ledger_strategy(), mantissa in -99_999_i64..99_999, precision in 5_u32..12) {
		let amount = Decimal::new(mantissa.into(), precision, 2).expect("five digits fit");
		let value = value.set(&Patch::new().set("amount", amount)).expect("same scale is accepted");
		check_round_trip(&value)?;
	}

	#[test]
	fn union_holders_round_trip(value in holder_strategy()) {
		check_round_trip(&value)?;
	}

	#[test]
	fn badge_marks_round_trip(value in badge_strategy()) {
		check_round_trip(&value)?;
	}

	#[test]
	fn numeric_union_members_round_trip(first in reading_member(), second in reading_member()) {
		check_round_trip(&Reading { first, second })?;
	}

	#[test]
	fn compact_notes_round_trip(value in note_strategy()) {
		check_round_trip(&value)?;
	}

	#[test]
	fn control_characters_survive_quoting(name in "[\\x00-\\x1f\"\\\\a-z ]{0,16}") {
		let hole = Hole { id: 1.0, value: 2.0, name };
		let parsed = Hole::deserialize(&hole.serialize()).expect("escaped text reads back");
		prop_assert_eq!(parsed, hole);
	}

	#[test]
	fn compact_labels_round_trip(label in "\\PC{0,10}") {
		let zed = Zed { label };
		let parsed = Zed::deserialize(&zed.serialize()).expect("compact text reads back");
		prop_assert_eq!(parsed, zed);
	}

	#[test]
	fn decimal_text_round_trips(mantissa in -999_999_999_i64..999_999_999_i64, scale in 0_u32..6) {
		let value = Decimal::new(mantissa.into(), 12, scale).expect("nine digits fit precision 12");
		let parsed = Decimal::from_strict_string(12, scale, &value.to_string()).expect("canonical text parses strictly");
		prop_assert_eq!(&parsed, &value);
		prop_assert_eq!(parsed.to_rational(), value.to_rational());
	}

	#[test]
	fn rational_sum_is_reduced(a in -1000_i64..1000, b in 1_i64..1000, c in -1000_i64..1000, d in 1_i64..1000) {
		let left = Rational::from_ints(a, b).expect("positive denominator");
		let right = Rational::from_ints(c, d).expect("positive denominator");
		let sum = left.add(&right);
		prop_assert_eq!(&sum, &Rational::from_ints(a * d + c * b, b * d).expect("positive denominator"));
		prop_assert_eq!(sum.to_string().parse::<Rational>().expect("display parses"), sum.clone());
		prop_assert_eq!(Value::from(sum.clone()).hash_code(), Value::from(sum).hash_code());
	}
}

fn shared_default(ty: &'static MessageType) {
	let handles: Vec<_> = (0..8).map(|_| thread::spawn(move || ty.default_value().expect("default builds"))).collect();
	let values: Vec<_> = handles.into_iter().map(|handle| handle.join().expect("thread completes")).collect();
	for value in &values[1..] {
		assert!(value.ptr_eq(&values[0]), "every thread sees the same default instance");
	}
}

#[test]
fn default_instance_is_shared_across_threads() {
	shared_default(&HOLE);
	shared_default(&DATED);

	let dated = Dated::default_instance().expect("default converts");
	assert_eq!(dated.serialize(), r#":{0,D"1970-01-01T00:00:00.000Z",4:""}"#);
	assert_eq!(Hole::default_instance().expect("default converts").serialize(), r#":{0,3:0,""}"#);
}
