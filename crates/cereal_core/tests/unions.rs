#![allow(missing_docs)]

use cereal::model::{CerealError, Decimal, List, Message, MessageValue, ReadOptions, Value, deserialize_union};
use cereal_testkit::{ALPHA, Alpha, AlphaCopy, BETA, Badge, Beta, Holder, Reading, ZED, Zed};

#[test]
fn untagged_union_with_identical_shapes_is_rejected() {
	let err = Holder::deserialize(r#":{union:{name:"Alpha"}}"#).expect_err("Alpha and Beta both fit");
	match err {
		CerealError::AmbiguousUnion { field, candidates } => {
			assert_eq!(field, "Holder.union");
			assert_eq!(candidates, ["Alpha", "Beta"]);
		}
		other => panic!("expected ambiguity, got {other:?}"),
	}
}

#[test]
fn tagged_union_member_is_accepted() {
	let holder = Holder::deserialize(r#":{union:$Alpha{name:"Alpha"}}"#).expect("tagged member decodes");
	let alpha: Alpha = holder.union.to_message().expect("member is an Alpha");
	assert_eq!(alpha, Alpha::named("Alpha"));
	assert!(holder.union.to_message::<Beta>().is_err());
}

#[test]
fn writer_tags_members_of_multi_message_unions() {
	let holder = Holder::new(Beta::named("b"));
	let text = holder.serialize();
	assert_eq!(text, ":{$Beta{b}}");
	assert_eq!(Holder::deserialize(&text).expect("written form reads back"), holder);
}

#[test]
fn unknown_tag_in_union_names_the_type() {
	let err = Holder::deserialize(":{$Zed{x}}").expect_err("Zed is not a member");
	assert!(matches!(err, CerealError::UnknownUnionType { type_name, .. } if type_name == "Zed"));
}

#[test]
fn compact_union_members_mix_with_text() {
	let badge = Badge {
		marks: List::from(vec![
			Value::from("plain"),
			Zed { label: "hi".to_owned() }.into_value(),
			Zed {
				label: "two words".to_owned(),
			}
			.into_value(),
		]),
	};
	let text = badge.serialize();
	assert_eq!(text, r#":{["plain",Zhi,Z"two words"]}"#);
	assert_eq!(Badge::deserialize(&text).expect("badge decodes"), badge);
}

#[test]
fn copies_of_a_type_share_identity() {
	let alpha = Alpha::named("x");
	let copy = AlphaCopy::named("x");

	assert!(Alpha::is_instance(&copy));
	assert!(AlphaCopy::is_instance(&alpha));
	assert!(alpha.equals(&copy));
	assert!(!alpha.equals(&Beta::named("x")));
	assert_eq!(alpha.hash_code(), copy.hash_code());

	let rebuilt: Alpha = MessageValue::new(copy).to_message().expect("same identity converts");
	assert_eq!(rebuilt, alpha);
}

#[test]
fn top_level_payload_resolves_among_candidates() {
	let opt = ReadOptions::default();
	let value = deserialize_union(":$Beta{b}", &[&ALPHA, &BETA], &opt).expect("tagged payload resolves");
	assert_eq!(value.to_message::<Beta>().expect("resolved to Beta"), Beta::named("b"));

	let err = deserialize_union(":{b}", &[&ALPHA, &BETA], &opt).expect_err("untagged payload is ambiguous");
	assert!(matches!(err, CerealError::AmbiguousUnion { field, .. } if field == "$"));
}

fn cents(text: &str) -> Value {
	Value::Decimal(Decimal::from_strict_string(10, 2, text).expect("valid decimal"))
}

#[test]
fn decimal_and_number_members_keep_their_variant() {
	let decimals = Reading {
		first: cents("1.50"),
		second: cents("1.25"),
	};
	let text = decimals.serialize();
	assert_eq!(text, r#":{"1.50","1.25"}"#);
	assert_eq!(Reading::deserialize(&text).expect("decimals decode"), decimals);

	let numbers = Reading {
		first: Value::from(1.5),
		second: Value::from(1.234),
	};
	let text = numbers.serialize();
	assert_eq!(text, ":{1.5,1.234}");
	assert_eq!(Reading::deserialize(&text).expect("numbers decode"), numbers);
}

#[test]
fn tagged_compact_member_inside_a_union() {
	let badge = Badge::deserialize(r#":{[$Zed"two words","plain"]}"#).expect("tagged compact member decodes");
	let first = badge.marks.get(0).and_then(Value::as_message).expect("first mark is a message");
	assert_eq!(first.to_message::<Zed>().expect("first mark is a Zed").label, "two words");

	let opt = ReadOptions::default();
	let zed = deserialize_union(r#":$Zed"x""#, &[&ZED, &ALPHA], &opt).expect("tagged payload resolves");
	assert_eq!(zed.message_type().name(), "Zed");
}
