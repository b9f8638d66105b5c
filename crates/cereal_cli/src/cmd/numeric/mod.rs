use cereal::model::{Decimal, Rational};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct DecimalArgs {
	pub precision: u32,
	pub scale: u32,
	#[arg(allow_hyphen_values = true)]
	pub text: String,
	/// Accept only the canonical rendering at exactly `scale` digits.
	#[arg(long)]
	pub strict: bool,
	#[arg(long)]
	pub json: bool,
}

#[derive(clap::Args)]
pub struct RationalArgs {
	#[arg(allow_hyphen_values = true)]
	pub text: String,
	#[arg(long)]
	pub json: bool,
}

/// Parse a decimal at the given shape and print its canonical text.
pub fn run_decimal(args: DecimalArgs) -> cereal::model::Result<()> {
	let DecimalArgs {
		precision,
		scale,
		text,
		strict,
		json,
	} = args;

	let value = if strict {
		Decimal::from_strict_string(precision, scale, &text)?
	} else {
		Decimal::from_string(precision, scale, &text)?
	};

	if json {
		emit_json(&DecimalJson {
			input: text,
			canonical: value.to_string(),
			mantissa: value.mantissa().to_string(),
			precision: value.precision(),
			scale: value.scale(),
		});
	} else {
		println!("{value}");
	}
	Ok(())
}

/// Parse a fraction and print it in lowest terms.
pub fn run_rational(args: RationalArgs) -> cereal::model::Result<()> {
	let RationalArgs { text, json } = args;
	let value = Rational::from_string(&text)?;

	if json {
		emit_json(&RationalJson {
			input: text,
			canonical: value.to_string(),
			numerator: value.numerator().to_string(),
			denominator: value.denominator().to_string(),
			integer: value.is_integer(),
		});
	} else {
		println!("{value}");
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct DecimalJson {
	input: String,
	canonical: String,
	mantissa: String,
	precision: u32,
	scale: u32,
}

#[derive(serde::Serialize)]
struct RationalJson {
	input: String,
	canonical: String,
	numerator: String,
	denominator: String,
	integer: bool,
}

#[cfg(test)]
mod tests;
