use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

use crate::model::NumericError;

/// Largest decimal exponent accepted in numeric text.
const MAX_EXPONENT: i64 = 4096;

/// Rounding behavior for operations that may produce more digits than the target scale holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
	/// Fail with [`NumericError::Inexact`] when digits would be lost.
	#[default]
	Exact,
	/// Round to nearest, ties away from zero.
	HalfAwayFromZero,
}

/// Rounding used by permissive decimal parsing.
pub const DEFAULT_ROUNDING: Rounding = Rounding::HalfAwayFromZero;

/// Grammar accepted by [`parse_literal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralMode {
	/// `-?digits(.digits)?` only.
	Strict,
	/// Whitespace, `+`, separators, exponent, and `n/d` fractions.
	Permissive,
}

/// Parse numeric text into an unreduced fraction with positive denominator.
pub(crate) fn parse_literal(text: &str, mode: LiteralMode) -> Result<(BigInt, BigInt), NumericError> {
	if mode == LiteralMode::Strict {
		return parse_plain(text, mode).ok_or_else(|| NumericError::syntax(text));
	}

	let trimmed = text.trim();
	if is_non_finite_word(trimmed) {
		return Err(NumericError::syntax(text));
	}

	let Some((left, right)) = trimmed.split_once('/') else {
		return parse_plain(trimmed, mode).ok_or_else(|| NumericError::syntax(text));
	};

	let (n1, d1) = parse_plain(left.trim(), mode).ok_or_else(|| NumericError::syntax(text))?;
	let (n2, d2) = parse_plain(right.trim(), mode).ok_or_else(|| NumericError::syntax(text))?;
	if n2.is_zero() {
		return Err(NumericError::DivisionByZero);
	}

	let numer = n1 * &d2;
	let denom = d1 * n2;
	if denom.is_negative() { Ok((-numer, -denom)) } else { Ok((numer, denom)) }
}

fn is_non_finite_word(text: &str) -> bool {
	let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text).to_ascii_lowercase();
	matches!(unsigned.as_str(), "nan" | "inf" | "infinity")
}

fn parse_plain(text: &str, mode: LiteralMode) -> Option<(BigInt, BigInt)> {
	let bytes = text.as_bytes();
	let mut idx = 0_usize;

	let negative = match bytes.first() {
		Some(b'-') => {
			idx += 1;
			true
		}
		Some(b'+') if mode == LiteralMode::Permissive => {
			idx += 1;
			false
		}
		_ => false,
	};

	let mut digits = String::with_capacity(text.len());
	let int_start = idx;
	while idx < bytes.len() {
		let byte = bytes[idx];
		if byte.is_ascii_digit() {
			digits.push(char::from(byte));
		} else if !(mode == LiteralMode::Permissive && matches!(byte, b',' | b'_') && is_between_digits(bytes, idx)) {
			break;
		}
		idx += 1;
	}
	let int_len = idx - int_start;

	let mut frac_len = 0_i64;
	if bytes.get(idx) == Some(&b'.') {
		idx += 1;
		let frac_start = idx;
		while idx < bytes.len() {
			let byte = bytes[idx];
			if byte.is_ascii_digit() {
				digits.push(char::from(byte));
				frac_len += 1;
			} else if !(mode == LiteralMode::Permissive && byte == b'_' && is_between_digits(bytes, idx)) {
				break;
			}
			idx += 1;
		}
		if mode == LiteralMode::Strict && (idx == frac_start || int_len == 0) {
			return None;
		}
	}

	if digits.is_empty() {
		return None;
	}

	let mut exponent = 0_i64;
	if mode == LiteralMode::Permissive && matches!(bytes.get(idx), Some(b'e' | b'E')) {
		idx += 1;
		let exp_start = idx;
		if matches!(bytes.get(idx), Some(b'+' | b'-')) {
			idx += 1;
		}
		while idx < bytes.len() && bytes[idx].is_ascii_digit() {
			idx += 1;
		}
		exponent = text.get(exp_start..idx)?.parse::<i64>().ok()?;
		if exponent.abs() > MAX_EXPONENT {
			return None;
		}
	}

	if idx != bytes.len() {
		return None;
	}

	let mut numer = digits.parse::<BigInt>().ok()?;
	if negative {
		numer = -numer;
	}

	let shift = exponent - frac_len;
	let magnitude = u32::try_from(shift.unsigned_abs()).ok()?;
	if shift >= 0 {
		Some((numer * pow10(magnitude), BigInt::from(1)))
	} else {
		Some((numer, pow10(magnitude)))
	}
}

fn is_between_digits(bytes: &[u8], idx: usize) -> bool {
	idx > 0 && bytes[idx - 1].is_ascii_digit() && bytes.get(idx + 1).is_some_and(u8::is_ascii_digit)
}

/// `10^exp` as a big integer.
pub(crate) fn pow10(exp: u32) -> BigInt {
	BigInt::from(10_u32).pow(exp)
}

/// Number of decimal digits in `|value|` (zero counts as one digit).
pub(crate) fn digit_count(value: &BigInt) -> u32 {
	u32::try_from(value.magnitude().to_str_radix(10).len()).unwrap_or(u32::MAX)
}

/// Divide `numer` by a positive `denom`, applying `rounding` to any remainder.
pub(crate) fn round_div(numer: &BigInt, denom: &BigInt, rounding: Rounding, operation: &'static str, scale: u32) -> Result<BigInt, NumericError> {
	let (quotient, remainder) = numer.div_rem(denom);
	if remainder.is_zero() {
		return Ok(quotient);
	}

	match rounding {
		Rounding::Exact => Err(NumericError::Inexact { operation, scale }),
		Rounding::HalfAwayFromZero => {
			let twice = remainder.abs() * 2;
			if &twice >= denom { Ok(quotient + numer.signum()) } else { Ok(quotient) }
		}
	}
}
