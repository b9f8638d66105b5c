use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::model::numeric::{DEFAULT_ROUNDING, LiteralMode, Rounding, digit_count, parse_literal, pow10, round_div};
use crate::model::{NumericError, Rational};

/// Fixed-point decimal: `mantissa × 10^-scale` with at most `precision` digits.
///
/// Equality is structural (`mantissa`, `precision`, `scale`); ordering is numeric first
/// and falls back to precision and scale so it agrees with equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
	mantissa: BigInt,
	precision: u32,
	scale: u32,
}

impl Decimal {
	/// Build from a raw mantissa, validating the precision/scale shape and digit count.
	pub fn new(mantissa: BigInt, precision: u32, scale: u32) -> Result<Self, NumericError> {
		check_shape(precision, scale)?;
		let digits = digit_count(&mantissa);
		if digits > precision {
			return Err(NumericError::Overflow { digits, precision });
		}
		Ok(Self { mantissa, precision, scale })
	}

	/// Zero at the given precision and scale.
	pub fn zero(precision: u32, scale: u32) -> Result<Self, NumericError> {
		Self::new(BigInt::zero(), precision, scale)
	}

	/// Permissive parse: surrounding whitespace, `+`/`-`, `,`/`_` separators, exponent,
	/// and `n/d` fractions are accepted; extra fractional digits are rounded with
	/// [`DEFAULT_ROUNDING`]. Not-a-number and infinity spellings are rejected.
	pub fn from_string(precision: u32, scale: u32, text: &str) -> Result<Self, NumericError> {
		check_shape(precision, scale)?;
		let (numer, denom) = parse_literal(text, LiteralMode::Permissive)?;
		let mantissa = round_div(&(numer * pow10(scale)), &denom, DEFAULT_ROUNDING, "parse", scale)?;
		Self::new(mantissa, precision, scale)
	}

	/// Strict parse: only the canonical rendering at exactly `scale` fractional digits.
	pub fn from_strict_string(precision: u32, scale: u32, text: &str) -> Result<Self, NumericError> {
		check_shape(precision, scale)?;
		let (numer, denom) = parse_literal(text, LiteralMode::Strict)?;
		let mantissa = round_div(&(numer * pow10(scale)), &denom, Rounding::Exact, "parse", scale).map_err(|_| NumericError::syntax(text))?;
		let value = Self::new(mantissa, precision, scale)?;
		if value.to_string() != text {
			return Err(NumericError::syntax(text));
		}
		Ok(value)
	}

	/// Convert a fraction at the target shape.
	pub fn from_rational(value: &Rational, precision: u32, scale: u32, rounding: Rounding) -> Result<Self, NumericError> {
		check_shape(precision, scale)?;
		let mantissa = round_div(&(value.numerator() * pow10(scale)), value.denominator(), rounding, "convert", scale)?;
		Self::new(mantissa, precision, scale)
	}

	/// Unscaled integer value.
	pub fn mantissa(&self) -> &BigInt {
		&self.mantissa
	}

	/// Maximum significant digits.
	pub fn precision(&self) -> u32 {
		self.precision
	}

	/// Digits after the decimal point.
	pub fn scale(&self) -> u32 {
		self.scale
	}

	/// Whether the value is zero.
	pub fn is_zero(&self) -> bool {
		self.mantissa.is_zero()
	}

	/// Exact fraction for this value.
	pub fn to_rational(&self) -> Rational {
		Rational::from_nonzero(self.mantissa.clone(), pow10(self.scale))
	}

	/// Re-express at another precision and scale.
	pub fn rescale(&self, precision: u32, scale: u32, rounding: Rounding) -> Result<Self, NumericError> {
		check_shape(precision, scale)?;
		let mantissa = match scale.cmp(&self.scale) {
			Ordering::Equal => self.mantissa.clone(),
			Ordering::Greater => &self.mantissa * pow10(scale - self.scale),
			Ordering::Less => round_div(&self.mantissa, &pow10(self.scale - scale), rounding, "rescale", scale)?,
		};
		Self::new(mantissa, precision, scale)
	}

	/// Exact sum at the wider precision and scale of the operands.
	pub fn checked_add(&self, other: &Self) -> Result<Self, NumericError> {
		let (precision, scale) = self.result_shape(other);
		let sum = self.mantissa_at(scale) + other.mantissa_at(scale);
		Self::new(sum, precision, scale)
	}

	/// Exact difference at the wider precision and scale of the operands.
	pub fn checked_sub(&self, other: &Self) -> Result<Self, NumericError> {
		self.checked_add(&other.neg())
	}

	/// Product at the wider precision and scale; `rounding` decides whether lost digits are an error.
	pub fn checked_mul(&self, other: &Self, rounding: Rounding) -> Result<Self, NumericError> {
		let (precision, scale) = self.result_shape(other);
		let product = &self.mantissa * &other.mantissa;
		let mantissa = round_div(&product, &pow10(self.scale + other.scale - scale), rounding, "multiply", scale)?;
		Self::new(mantissa, precision, scale)
	}

	/// Quotient at the wider precision and scale; a zero divisor fails.
	pub fn checked_div(&self, other: &Self, rounding: Rounding) -> Result<Self, NumericError> {
		if other.is_zero() {
			return Err(NumericError::DivisionByZero);
		}
		let (precision, scale) = self.result_shape(other);
		let mut numer = &self.mantissa * pow10(other.scale + scale - self.scale);
		let mut denom = other.mantissa.clone();
		if denom.is_negative() {
			numer = -numer;
			denom = -denom;
		}
		let mantissa = round_div(&numer, &denom, rounding, "divide", scale)?;
		Self::new(mantissa, precision, scale)
	}

	/// Negation at the same shape.
	pub fn neg(&self) -> Self {
		Self {
			mantissa: -&self.mantissa,
			precision: self.precision,
			scale: self.scale,
		}
	}

	/// Absolute value at the same shape.
	pub fn abs(&self) -> Self {
		Self {
			mantissa: self.mantissa.abs(),
			precision: self.precision,
			scale: self.scale,
		}
	}

	fn result_shape(&self, other: &Self) -> (u32, u32) {
		(self.precision.max(other.precision), self.scale.max(other.scale))
	}

	fn mantissa_at(&self, scale: u32) -> BigInt {
		&self.mantissa * pow10(scale - self.scale)
	}
}

fn check_shape(precision: u32, scale: u32) -> Result<(), NumericError> {
	if precision == 0 || scale > precision {
		return Err(NumericError::PrecisionScaleRange { precision, scale });
	}
	Ok(())
}

impl Ord for Decimal {
	fn cmp(&self, other: &Self) -> Ordering {
		let scale = self.scale.max(other.scale);
		self.mantissa_at(scale)
			.cmp(&other.mantissa_at(scale))
			.then_with(|| self.precision.cmp(&other.precision))
			.then_with(|| self.scale.cmp(&other.scale))
	}
}

impl PartialOrd for Decimal {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl fmt::Display for Decimal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let digits = self.mantissa.magnitude().to_str_radix(10);
		let sign = if self.mantissa.is_negative() { "-" } else { "" };
		let scale = self.scale as usize;
		if scale == 0 {
			return write!(f, "{sign}{digits}");
		}

		let padded = format!("{digits:0>width$}", width = scale + 1);
		let (int_part, frac_part) = padded.split_at(padded.len() - scale);
		write!(f, "{sign}{int_part}.{frac_part}")
	}
}
