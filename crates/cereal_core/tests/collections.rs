#![allow(missing_docs)]

use cereal::model::{List, Map, Message, PersistentCollection, Set, Value};
use cereal_testkit::{Alpha, Gamma};

fn pair(a: i32, b: i32) -> Value {
	Value::List(List::from(vec![Value::from(a), Value::from(b)]))
}

#[test]
fn structurally_equal_keys_collapse_with_last_write_winning() {
	let map = Map::new().insert(pair(1, 2), Value::from("first"));
	let map = map.insert(pair(1, 2), Value::from("second"));
	assert_eq!(map.len(), 1);
	assert_eq!(map.get(&pair(1, 2)), Some(&Value::from("second")));
}

#[test]
fn updates_leave_the_original_untouched() {
	let list = List::from(vec![Value::from(1), Value::from(2)]);
	let pushed = list.push(Value::from(3));
	assert_eq!(list.len(), 2);
	assert_eq!(pushed.len(), 3);

	let set = Set::new().add(Value::from("a"));
	let grown = set.add(Value::from("b"));
	assert!(!set.contains(&Value::from("b")));
	assert!(grown.contains(&Value::from("b")));
}

#[test]
fn message_values_compare_structurally_inside_collections() {
	let set: Set = [Alpha::named("x").into_value(), Alpha::named("x").into_value(), Alpha::named("y").into_value()]
		.into_iter()
		.collect();
	assert_eq!(set.len(), 2);

	let left = Value::List(List::from(vec![Gamma { id: 1.0, note: None }.into_value()]));
	let right = Value::List(List::from(vec![Gamma { id: 1.0, note: None }.into_value()]));
	assert_eq!(left, right);
	assert_eq!(left.hash_code(), right.hash_code());
}
