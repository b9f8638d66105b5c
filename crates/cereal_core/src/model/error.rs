use std::fmt;

use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, CerealError>;

/// Errors produced while reading, validating, and reconstructing cereal data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CerealError {
	/// Malformed cereal text.
	#[error(transparent)]
	Parse(#[from] ParseError),
	/// A decoded or constructed value violates a field constraint.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Untagged union payload matched zero or several message candidates.
	#[error("ambiguous union payload for field {field}: candidates [{}]", candidates.join(", "))]
	AmbiguousUnion {
		/// Field path holding the union.
		field: String,
		/// Competing candidate type names.
		candidates: Vec<String>,
	},
	/// Tagged union payload named a type outside the union.
	#[error("unknown type {type_name} for union field {field}")]
	UnknownUnionType {
		/// Field path holding the union.
		field: String,
		/// Tag or type name found in the payload.
		type_name: String,
	},
	/// Decimal or rational domain failure.
	#[error(transparent)]
	Numeric(#[from] NumericError),
}

/// Malformed cereal text at a byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at offset {at}: {kind}")]
pub struct ParseError {
	/// Byte offset of the offending input.
	pub at: usize,
	/// What went wrong.
	pub kind: ParseErrorKind,
}

impl ParseError {
	pub(crate) fn new(at: usize, kind: ParseErrorKind) -> Self {
		Self { at, kind }
	}
}

/// Parse failure categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
	/// Payload did not start with `:`.
	#[error("missing ':' prefix")]
	MissingPrefix,
	/// Input ended inside a value.
	#[error("unexpected end of input")]
	UnexpectedEof,
	/// Character that cannot start or continue the current token.
	#[error("unexpected character {found:?}")]
	UnexpectedChar {
		/// Offending character.
		found: char,
	},
	/// Quoted string without a closing quote.
	#[error("unterminated string")]
	UnterminatedString,
	/// Invalid backslash escape.
	#[error("bad escape sequence")]
	BadEscape,
	/// Tag character that is neither built in nor registered.
	#[error("unknown tag {tag:?}")]
	UnknownTag {
		/// Tag character.
		tag: char,
	},
	/// Numeric literal with invalid shape.
	#[error("invalid number {text:?}")]
	InvalidNumber {
		/// Literal text as found.
		text: String,
	},
	/// Tagged literal whose payload failed to parse.
	#[error("invalid {what} literal {text:?}")]
	InvalidLiteral {
		/// Literal family (`date`, `url`, `bytes`, `rational`).
		what: &'static str,
		/// Payload text.
		text: String,
	},
	/// Field number outside the addressable range.
	#[error("field number {number} out of range")]
	FieldNumberOutOfRange {
		/// Parsed field number.
		number: u64,
	},
	/// Same field addressed twice in one object.
	#[error("duplicate field {field}")]
	DuplicateField {
		/// Field name or number.
		field: String,
	},
	/// Nesting exceeded the configured ceiling.
	#[error("nesting depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Extra characters after the top-level value.
	#[error("trailing input")]
	TrailingInput,
}

/// Field constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field {field}: {constraint}")]
pub struct ValidationError {
	/// Field path.
	pub field: String,
	/// Human-readable constraint description.
	pub constraint: String,
	/// Offending value, rendered for diagnostics.
	pub value: Option<String>,
	/// Machine-readable failure code.
	pub code: ValidationCode,
}

impl ValidationError {
	pub(crate) fn required(field: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			constraint: "required field is missing".to_owned(),
			value: None,
			code: ValidationCode::Required,
		}
	}

	pub(crate) fn type_mismatch(field: impl Into<String>, expected: impl fmt::Display, found: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			constraint: format!("expected {expected}"),
			value: Some(found.into()),
			code: ValidationCode::TypeMismatch,
		}
	}

	pub(crate) fn unknown_field(field: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			constraint: "field is not declared".to_owned(),
			value: None,
			code: ValidationCode::UnknownField,
		}
	}

	pub(crate) fn invalid_value(field: impl Into<String>, constraint: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			constraint: constraint.into(),
			value: Some(value.into()),
			code: ValidationCode::InvalidValue,
		}
	}
}

/// Machine-readable validation failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationCode {
	/// Required field absent.
	Required,
	/// Value shape does not match the declared field type.
	TypeMismatch,
	/// Entry addresses a field the type does not declare.
	UnknownField,
	/// Value has the right shape but violates a domain constraint.
	InvalidValue,
}

impl ValidationCode {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Required => "required",
			Self::TypeMismatch => "type_mismatch",
			Self::UnknownField => "unknown_field",
			Self::InvalidValue => "invalid_value",
		}
	}
}

/// Decimal and rational domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumericError {
	/// Result or input needs more digits than the declared precision.
	#[error("decimal overflow: {digits} digits exceed precision {precision}")]
	Overflow {
		/// Significant digits required.
		digits: u32,
		/// Declared precision.
		precision: u32,
	},
	/// Result cannot be represented exactly at the target scale.
	#[error("inexact {operation} at scale {scale}")]
	Inexact {
		/// Operation that lost digits.
		operation: &'static str,
		/// Target scale.
		scale: u32,
	},
	/// Zero divisor or zero denominator.
	#[error("division by zero")]
	DivisionByZero,
	/// Precision or scale outside `1 <= precision`, `scale <= precision`.
	#[error("precision/scale out of range: precision={precision}, scale={scale}")]
	PrecisionScaleRange {
		/// Requested precision.
		precision: u32,
		/// Requested scale.
		scale: u32,
	},
	/// Text is not a number this parser accepts.
	#[error("invalid numeric syntax: {text:?}")]
	Syntax {
		/// Rejected input.
		text: String,
	},
}

impl NumericError {
	pub(crate) fn syntax(text: &str) -> Self {
		Self::Syntax { text: text.to_owned() }
	}
}
