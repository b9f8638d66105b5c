#![allow(missing_docs)]

use cereal::model::{Decimal, NumericError, Rational, Rounding};
use num_bigint::BigInt;

#[test]
fn strict_decimal_parse_is_canonical() {
	let value = Decimal::from_strict_string(5, 2, "123.45").expect("canonical text parses");
	assert_eq!(value.to_string(), "123.45");
	assert_eq!(value.mantissa(), &BigInt::from(12_345));
}

#[test]
fn decimal_overflow_is_reported_at_construction() {
	assert_eq!(
		Decimal::new(BigInt::from(123_456), 5, 2),
		Err(NumericError::Overflow { digits: 6, precision: 5 })
	);
	assert!(matches!(Decimal::from_string(4, 2, "123.45"), Err(NumericError::Overflow { .. })));
}

#[test]
fn one_third_rounds_at_scale_two() {
	let third = Rational::from_ints(1, 3).expect("nonzero denominator");
	let value = Decimal::from_rational(&third, 10, 2, Rounding::HalfAwayFromZero).expect("rounded conversion");
	assert_eq!(value.to_string(), "0.33");
	assert!(matches!(
		Decimal::from_rational(&third, 10, 2, Rounding::Exact),
		Err(NumericError::Inexact { .. })
	));
	assert_eq!(Decimal::from_string(10, 2, "1/3").expect("permissive fraction").to_string(), "0.33");
}

#[test]
fn decimal_division_by_zero_fails() {
	let one = Decimal::from_strict_string(5, 2, "1.00").expect("one");
	let zero = Decimal::zero(5, 2).expect("zero");
	assert_eq!(one.checked_div(&zero, Rounding::HalfAwayFromZero), Err(NumericError::DivisionByZero));
}

#[test]
fn rational_reduces_and_adds_exactly() {
	let half = Rational::from_ints(2, 4).expect("nonzero denominator");
	assert_eq!(half.to_string(), "1/2");
	assert_eq!(half, Rational::from_ints(1, 2).expect("nonzero denominator"));

	let sixth = Rational::from_ints(1, 6).expect("nonzero denominator");
	assert_eq!(sixth.add(&sixth), Rational::from_ints(1, 3).expect("nonzero denominator"));
}

#[test]
fn rational_zero_denominator_fails() {
	assert_eq!(Rational::from_ints(1, 0), Err(NumericError::DivisionByZero));
	assert_eq!(Rational::from_string("5/0"), Err(NumericError::DivisionByZero));
	assert_eq!(Rational::zero().recip(), Err(NumericError::DivisionByZero));
}

#[test]
fn decimal_and_rational_agree() {
	let value = Decimal::from_strict_string(6, 3, "-1.250").expect("canonical text parses");
	assert_eq!(value.to_rational(), Rational::from_ints(-5, 4).expect("nonzero denominator"));
}
