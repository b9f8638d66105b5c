use num_bigint::BigInt;

use crate::model::{NumericError, Rational};

#[test]
fn construction_reduces_to_lowest_terms() {
	let half = Rational::from_ints(2, 4).expect("valid fraction");
	assert_eq!(half.to_string(), "1/2");
	assert_eq!(half, Rational::from_ints(1, 2).expect("valid fraction"));
}

#[test]
fn sign_moves_onto_numerator() {
	let value = Rational::from_ints(3, -6).expect("valid fraction");
	assert_eq!(value.numerator(), &BigInt::from(-1));
	assert_eq!(value.denominator(), &BigInt::from(2));
	assert_eq!(value.to_string(), "-1/2");

	let positive = Rational::from_ints(-3, -6).expect("valid fraction");
	assert_eq!(positive.to_string(), "1/2");
}

#[test]
fn zero_denominator_is_rejected() {
	assert_eq!(Rational::from_ints(1, 0), Err(NumericError::DivisionByZero));
	assert_eq!(Rational::from_ints(0, 0), Err(NumericError::DivisionByZero));

	let third = Rational::from_ints(1, 3).expect("valid fraction");
	assert_eq!(third.with_denominator(BigInt::from(0)), Err(NumericError::DivisionByZero));
}

#[test]
fn whole_numbers_render_without_denominator() {
	assert_eq!(Rational::zero().to_string(), "0");
	assert_eq!(Rational::from_ints(0, 7).expect("valid fraction").to_string(), "0");
	assert_eq!(Rational::from_ints(10, 5).expect("valid fraction").to_string(), "2");
}

#[test]
fn arithmetic_stays_reduced() {
	let sixth = Rational::from_ints(1, 6).expect("valid fraction");
	assert_eq!(sixth.add(&sixth).to_string(), "1/3");
	assert_eq!(sixth.sub(&sixth).to_string(), "0");
	assert_eq!(sixth.mul(&Rational::from_ints(3, 1).expect("valid fraction")).to_string(), "1/2");

	let quotient = sixth.checked_div(&Rational::from_ints(1, 3).expect("valid fraction")).expect("nonzero divisor");
	assert_eq!(quotient.to_string(), "1/2");
	assert_eq!(sixth.checked_div(&Rational::zero()), Err(NumericError::DivisionByZero));
	assert_eq!(Rational::zero().recip(), Err(NumericError::DivisionByZero));
}

#[test]
fn setters_reduce_and_validate() {
	let third = Rational::from_ints(1, 3).expect("valid fraction");
	assert_eq!(third.with_numerator(BigInt::from(2)).to_string(), "2/3");
	assert_eq!(third.with_numerator(BigInt::from(3)).to_string(), "1");
	assert_eq!(third.with_denominator(BigInt::from(9)).expect("nonzero").to_string(), "1/9");
}

#[test]
fn parses_fractions_and_exponents() {
	assert_eq!(Rational::from_string("6/8").expect("fraction parses").to_string(), "3/4");
	assert_eq!(Rational::from_string("-6/-8").expect("fraction parses").to_string(), "3/4");
	assert_eq!(Rational::from_string("1.5").expect("decimal parses").to_string(), "3/2");
	assert_eq!(Rational::from_string("1.5e-3").expect("exponent parses").to_string(), "3/2000");
	assert_eq!(Rational::from_string("2E3").expect("exponent parses").to_string(), "2000");
	assert_eq!("7".parse::<Rational>().expect("integer parses").to_string(), "7");

	assert_eq!(Rational::from_string("1/0"), Err(NumericError::DivisionByZero));
	assert!(matches!(Rational::from_string("one/two"), Err(NumericError::Syntax { .. })));
	assert!(matches!(Rational::from_string("NaN"), Err(NumericError::Syntax { .. })));
}

#[test]
fn ordering_is_numeric() {
	let third = Rational::from_ints(1, 3).expect("valid fraction");
	let half = Rational::from_ints(1, 2).expect("valid fraction");
	let negative = Rational::from_ints(-2, 3).expect("valid fraction");
	assert!(third < half);
	assert!(negative < third);
	assert_eq!(half.abs(), half.neg().abs());
}
