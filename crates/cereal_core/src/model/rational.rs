use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::model::NumericError;
use crate::model::numeric::{LiteralMode, parse_literal};

/// Exact fraction stored in lowest terms with a positive denominator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
	numer: BigInt,
	denom: BigInt,
}

impl Rational {
	/// Build a reduced fraction; a zero denominator is rejected even for `0/0`.
	pub fn new(numer: BigInt, denom: BigInt) -> Result<Self, NumericError> {
		if denom.is_zero() {
			return Err(NumericError::DivisionByZero);
		}
		Ok(Self::reduce(numer, denom))
	}

	/// Build from machine integers.
	pub fn from_ints(numer: i64, denom: i64) -> Result<Self, NumericError> {
		Self::new(BigInt::from(numer), BigInt::from(denom))
	}

	/// Whole number `value/1`.
	pub fn from_integer(value: BigInt) -> Self {
		Self {
			numer: value,
			denom: BigInt::one(),
		}
	}

	/// The zero fraction.
	pub fn zero() -> Self {
		Self::from_integer(BigInt::zero())
	}

	/// Parse `n/d`, integers, decimals, or exponent notation into a reduced fraction.
	pub fn from_string(text: &str) -> Result<Self, NumericError> {
		let (numer, denom) = parse_literal(text, LiteralMode::Permissive)?;
		Self::new(numer, denom)
	}

	/// Build from a denominator already known to be nonzero.
	pub(crate) fn from_nonzero(numer: BigInt, denom: BigInt) -> Self {
		Self::reduce(numer, denom)
	}

	fn reduce(numer: BigInt, denom: BigInt) -> Self {
		let gcd = numer.gcd(&denom);
		let (mut numer, mut denom) = if gcd.is_zero() || gcd.is_one() { (numer, denom) } else { (numer / &gcd, denom / &gcd) };
		if denom.is_negative() {
			numer = -numer;
			denom = -denom;
		}
		Self { numer, denom }
	}

	/// Signed numerator.
	pub fn numerator(&self) -> &BigInt {
		&self.numer
	}

	/// Positive denominator.
	pub fn denominator(&self) -> &BigInt {
		&self.denom
	}

	/// Copy with a new numerator, reduced against the current denominator.
	pub fn with_numerator(&self, numer: BigInt) -> Self {
		Self::reduce(numer, self.denom.clone())
	}

	/// Copy with a new denominator; zero is rejected.
	pub fn with_denominator(&self, denom: BigInt) -> Result<Self, NumericError> {
		Self::new(self.numer.clone(), denom)
	}

	/// Whether the value is zero.
	pub fn is_zero(&self) -> bool {
		self.numer.is_zero()
	}

	/// Whether the denominator is one.
	pub fn is_integer(&self) -> bool {
		self.denom.is_one()
	}

	/// Sum, reduced.
	pub fn add(&self, other: &Self) -> Self {
		let numer = &self.numer * &other.denom + &other.numer * &self.denom;
		Self::reduce(numer, &self.denom * &other.denom)
	}

	/// Difference, reduced.
	pub fn sub(&self, other: &Self) -> Self {
		self.add(&other.neg())
	}

	/// Product, reduced.
	pub fn mul(&self, other: &Self) -> Self {
		Self::reduce(&self.numer * &other.numer, &self.denom * &other.denom)
	}

	/// Quotient, reduced; dividing by zero fails.
	pub fn checked_div(&self, other: &Self) -> Result<Self, NumericError> {
		Self::new(&self.numer * &other.denom, &self.denom * &other.numer)
	}

	/// Reciprocal; zero has none.
	pub fn recip(&self) -> Result<Self, NumericError> {
		Self::new(self.denom.clone(), self.numer.clone())
	}

	/// Negation.
	pub fn neg(&self) -> Self {
		Self {
			numer: -&self.numer,
			denom: self.denom.clone(),
		}
	}

	/// Absolute value.
	pub fn abs(&self) -> Self {
		Self {
			numer: self.numer.abs(),
			denom: self.denom.clone(),
		}
	}
}

impl Ord for Rational {
	fn cmp(&self, other: &Self) -> Ordering {
		(&self.numer * &other.denom).cmp(&(&other.numer * &self.denom))
	}
}

impl PartialOrd for Rational {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl fmt::Display for Rational {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.denom.is_one() {
			write!(f, "{}", self.numer)
		} else {
			write!(f, "{}/{}", self.numer, self.denom)
		}
	}
}

impl FromStr for Rational {
	type Err = NumericError;

	fn from_str(text: &str) -> Result<Self, Self::Err> {
		Self::from_string(text)
	}
}

#[cfg(test)]
mod tests;
