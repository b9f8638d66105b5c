use std::collections::HashSet;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use num_bigint::BigInt;
use url::Url;

use crate::model::node::{Entries, EntryKey, Node, RawEntry, TagSet};
use crate::model::schema::MAX_FIELD_NUMBER;
use crate::model::{Instant, ParseError, ParseErrorKind, Rational};

type ReadResult<T> = std::result::Result<T, ParseError>;

/// Bounded cursor over cereal text producing untyped [`Node`] trees.
pub(crate) struct Reader<'a> {
	text: &'a str,
	pos: usize,
	tags: &'a TagSet,
	max_depth: u32,
}

impl<'a> Reader<'a> {
	/// Create a reader at offset 0.
	pub(crate) fn new(text: &'a str, tags: &'a TagSet, max_depth: u32) -> Self {
		Self {
			text,
			pos: 0,
			tags,
			max_depth,
		}
	}

	/// Read `:` value, rejecting anything after it.
	pub(crate) fn read_document(mut self) -> ReadResult<Node> {
		self.skip_ws();
		if self.peek() != Some(b':') {
			return Err(self.error(ParseErrorKind::MissingPrefix));
		}
		self.pos += 1;

		let node = self.read_value(0)?;
		self.skip_ws();
		if self.pos < self.text.len() {
			return Err(self.error(ParseErrorKind::TrailingInput));
		}
		Ok(node)
	}

	fn read_value(&mut self, depth: u32) -> ReadResult<Node> {
		self.skip_ws();
		let Some(byte) = self.peek() else {
			return Err(self.error(ParseErrorKind::UnexpectedEof));
		};

		match byte {
			b'{' => self.read_object(depth),
			b'[' => Ok(Node::List(self.read_items(depth)?)),
			b'"' => Ok(Node::Str(self.read_string()?)),
			b'$' => self.read_tagged(depth),
			b'-' | b'0'..=b'9' => self.read_number(),
			b'Q' if matches!(self.peek_at(1), Some(b'-' | b'0'..=b'9')) => self.read_rational(),
			b'_' | b'A'..=b'Z' | b'a'..=b'z' => self.read_word(depth),
			_ => Err(self.unexpected()),
		}
	}

	fn read_object(&mut self, depth: u32) -> ReadResult<Node> {
		let depth = self.enter(depth)?;
		self.pos += 1;

		let mut entries = Vec::new();
		let mut numbers = HashSet::new();
		let mut names = HashSet::new();

		self.skip_ws();
		if self.peek() == Some(b'}') {
			self.pos += 1;
			return Ok(Node::Object(Entries { entries }));
		}

		loop {
			self.skip_ws();
			let at = self.pos;
			let key = self.read_key()?;
			let duplicate = match &key {
				EntryKey::Position => false,
				EntryKey::Number(number) => !numbers.insert(*number),
				EntryKey::Name(name) => !names.insert(name.clone()),
			};
			if duplicate {
				let field = match &key {
					EntryKey::Number(number) => number.to_string(),
					EntryKey::Name(name) => name.clone(),
					EntryKey::Position => String::new(),
				};
				return Err(ParseError::new(at, ParseErrorKind::DuplicateField { field }));
			}

			let value = self.read_value(depth)?;
			entries.push(RawEntry { key, value, at });

			if self.close_or_continue(b'}')? {
				return Ok(Node::Object(Entries { entries }));
			}
		}
	}

	fn read_key(&mut self) -> ReadResult<EntryKey> {
		let save = self.pos;
		match self.peek() {
			Some(b'0'..=b'9') => {
				let digits = self.scan_while(|b| b.is_ascii_digit());
				self.skip_ws();
				if self.peek() != Some(b':') {
					self.pos = save;
					return Ok(EntryKey::Position);
				}
				self.pos += 1;

				let number = digits.parse::<u64>().unwrap_or(u64::MAX);
				match u32::try_from(number) {
					Ok(number) if (1..=MAX_FIELD_NUMBER).contains(&number) => Ok(EntryKey::Number(number)),
					_ => Err(ParseError::new(save, ParseErrorKind::FieldNumberOutOfRange { number })),
				}
			}
			Some(b'_' | b'A'..=b'Z' | b'a'..=b'z') => {
				let name = self.scan_while(|b| b.is_ascii_alphanumeric() || b == b'_');
				self.skip_ws();
				if self.peek() != Some(b':') {
					self.pos = save;
					return Ok(EntryKey::Position);
				}
				self.pos += 1;
				Ok(EntryKey::Name(name.to_owned()))
			}
			_ => Ok(EntryKey::Position),
		}
	}

	fn read_items(&mut self, depth: u32) -> ReadResult<Vec<Node>> {
		let depth = self.enter(depth)?;
		self.pos += 1;

		let mut items = Vec::new();
		self.skip_ws();
		if self.peek() == Some(b']') {
			self.pos += 1;
			return Ok(items);
		}

		loop {
			items.push(self.read_value(depth)?);
			if self.close_or_continue(b']')? {
				return Ok(items);
			}
		}
	}

	fn read_map(&mut self, depth: u32) -> ReadResult<Node> {
		let depth = self.enter(depth)?;
		self.pos += 1;

		let mut pairs = Vec::new();
		self.skip_ws();
		if self.peek() == Some(b']') {
			self.pos += 1;
			return Ok(Node::Map(pairs));
		}

		loop {
			self.skip_ws();
			self.expect(b'[')?;
			let key = self.read_value(depth)?;
			self.skip_ws();
			self.expect(b',')?;
			let value = self.read_value(depth)?;
			self.skip_ws();
			self.expect(b']')?;
			pairs.push((key, value));

			if self.close_or_continue(b']')? {
				return Ok(Node::Map(pairs));
			}
		}
	}

	fn read_tagged(&mut self, depth: u32) -> ReadResult<Node> {
		let depth = self.enter(depth)?;
		self.pos += 1;

		if !matches!(self.peek(), Some(b'_' | b'A'..=b'Z' | b'a'..=b'z')) {
			return Err(self.unexpected());
		}
		let type_name = self.scan_while(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.').to_owned();
		let payload = self.read_value(depth)?;
		Ok(Node::Tagged {
			type_name,
			payload: Box::new(payload),
		})
	}

	fn read_number(&mut self) -> ReadResult<Node> {
		let start = self.pos;
		if self.peek() == Some(b'-') {
			self.pos += 1;
			if self.rest().starts_with("Infinity") {
				self.pos += "Infinity".len();
				return self.finish_token(Node::Number {
					value: f64::NEG_INFINITY,
					text: "-Infinity".to_owned(),
				});
			}
		}

		let mut integral = true;
		if self.scan_while(|b| b.is_ascii_digit()).is_empty() {
			return Err(self.invalid_number(start));
		}
		if self.peek() == Some(b'.') {
			self.pos += 1;
			integral = false;
			if self.scan_while(|b| b.is_ascii_digit()).is_empty() {
				return Err(self.invalid_number(start));
			}
		}
		if matches!(self.peek(), Some(b'e' | b'E')) {
			self.pos += 1;
			integral = false;
			if matches!(self.peek(), Some(b'+' | b'-')) {
				self.pos += 1;
			}
			if self.scan_while(|b| b.is_ascii_digit()).is_empty() {
				return Err(self.invalid_number(start));
			}
		}

		let text = &self.text[start..self.pos];
		if self.peek() == Some(b'n') {
			self.pos += 1;
			if !integral {
				return Err(self.invalid_number(start));
			}
			let value = BigInt::from_str(text).map_err(|_| self.invalid_number(start))?;
			return self.finish_token(Node::BigInt(value));
		}

		let value = text.parse::<f64>().map_err(|_| self.invalid_number(start))?;
		let text = text.to_owned();
		self.finish_token(Node::Number { value, text })
	}

	fn read_rational(&mut self) -> ReadResult<Node> {
		let start = self.pos;
		self.pos += 1;
		let body_start = self.pos;
		if self.peek() == Some(b'-') {
			self.pos += 1;
		}
		self.scan_while(|b| b.is_ascii_digit());
		if self.peek() == Some(b'/') {
			self.pos += 1;
			self.scan_while(|b| b.is_ascii_digit());
		}

		let body = &self.text[body_start..self.pos];
		let invalid = || {
			ParseError::new(
				start,
				ParseErrorKind::InvalidLiteral {
					what: "rational",
					text: body.to_owned(),
				},
			)
		};
		let (numer, denom) = body.split_once('/').unwrap_or((body, "1"));
		let numer = BigInt::from_str(numer).map_err(|_| invalid())?;
		let denom = BigInt::from_str(denom).map_err(|_| invalid())?;
		let value = Rational::new(numer, denom).map_err(|_| invalid())?;
		self.finish_token(Node::Rational(value))
	}

	fn read_word(&mut self, depth: u32) -> ReadResult<Node> {
		let start = self.pos;
		let word = self.scan_while(|b| b.is_ascii_alphanumeric() || b == b'_');

		match word {
			"true" => return Ok(Node::Bool(true)),
			"false" => return Ok(Node::Bool(false)),
			"null" | "undefined" => return Ok(Node::Null),
			"NaN" => {
				return Ok(Node::Number {
					value: f64::NAN,
					text: "NaN".to_owned(),
				});
			}
			"Infinity" => {
				return Ok(Node::Number {
					value: f64::INFINITY,
					text: "Infinity".to_owned(),
				});
			}
			_ => {}
		}

		let mut chars = word.chars();
		if let (Some(tag), None) = (chars.next(), chars.next()) {
			match (tag, self.peek()) {
				('D', Some(b'"')) => {
					let text = self.read_string()?;
					let value = Instant::parse_iso(&text).ok_or_else(|| invalid_literal(start, "date", &text))?;
					return Ok(Node::Date(value));
				}
				('U', Some(b'"')) => {
					let text = self.read_string()?;
					let value = Url::parse(&text).map_err(|_| invalid_literal(start, "url", &text))?;
					return Ok(Node::Url(value));
				}
				('B', Some(b'"')) => {
					let text = self.read_string()?;
					let value = STANDARD.decode(text.as_bytes()).map_err(|_| invalid_literal(start, "bytes", &text))?;
					return Ok(Node::Bytes(Bytes::from(value)));
				}
				('M', Some(b'[')) => return self.read_map(depth),
				('S', Some(b'[')) => return Ok(Node::Set(self.read_items(depth)?)),
				(_, Some(b'"')) if self.tags.contains(tag) => {
					let payload = self.read_string()?;
					return Ok(Node::Compact { tag, payload });
				}
				(_, Some(b'"' | b'[')) => return Err(ParseError::new(start, ParseErrorKind::UnknownTag { tag })),
				_ => {}
			}
		}

		Ok(Node::Word(word.to_owned()))
	}

	fn read_string(&mut self) -> ReadResult<String> {
		let start = self.pos;
		self.pos += 1;

		let mut out = String::new();
		loop {
			let Some(ch) = self.rest().chars().next() else {
				return Err(ParseError::new(start, ParseErrorKind::UnterminatedString));
			};
			self.pos += ch.len_utf8();
			match ch {
				'"' => return Ok(out),
				'\\' => out.push(self.read_escape(start)?),
				_ => out.push(ch),
			}
		}
	}

	fn read_escape(&mut self, string_start: usize) -> ReadResult<char> {
		let at = self.pos - 1;
		let Some(byte) = self.peek() else {
			return Err(ParseError::new(string_start, ParseErrorKind::UnterminatedString));
		};
		self.pos += 1;

		Ok(match byte {
			b'"' => '"',
			b'\\' => '\\',
			b'/' => '/',
			b'n' => '\n',
			b'r' => '\r',
			b't' => '\t',
			b'b' => '\u{8}',
			b'f' => '\u{c}',
			b'u' => {
				let unit = self.read_hex4(at)?;
				let code = match unit {
					0xD800..=0xDBFF => {
						if !self.rest().starts_with("\\u") {
							return Err(ParseError::new(at, ParseErrorKind::BadEscape));
						}
						self.pos += 2;
						let low = self.read_hex4(at)?;
						if !(0xDC00..=0xDFFF).contains(&low) {
							return Err(ParseError::new(at, ParseErrorKind::BadEscape));
						}
						0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
					}
					0xDC00..=0xDFFF => return Err(ParseError::new(at, ParseErrorKind::BadEscape)),
					_ => u32::from(unit),
				};
				char::from_u32(code).ok_or_else(|| ParseError::new(at, ParseErrorKind::BadEscape))?
			}
			_ => return Err(ParseError::new(at, ParseErrorKind::BadEscape)),
		})
	}

	fn read_hex4(&mut self, at: usize) -> ReadResult<u16> {
		let digits = self.rest().get(..4).ok_or_else(|| ParseError::new(at, ParseErrorKind::BadEscape))?;
		let unit = u16::from_str_radix(digits, 16).map_err(|_| ParseError::new(at, ParseErrorKind::BadEscape))?;
		if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
			return Err(ParseError::new(at, ParseErrorKind::BadEscape));
		}
		self.pos += 4;
		Ok(unit)
	}

	/// After an item: `true` on the closing byte, `false` on a comma.
	fn close_or_continue(&mut self, close: u8) -> ReadResult<bool> {
		self.skip_ws();
		match self.peek() {
			Some(b',') => {
				self.pos += 1;
				Ok(false)
			}
			Some(byte) if byte == close => {
				self.pos += 1;
				Ok(true)
			}
			_ => Err(self.unexpected()),
		}
	}

	fn finish_token(&self, node: Node) -> ReadResult<Node> {
		match self.peek() {
			Some(byte) if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'.' => Err(self.unexpected()),
			_ => Ok(node),
		}
	}

	fn enter(&self, depth: u32) -> ReadResult<u32> {
		let next = depth + 1;
		if next > self.max_depth {
			return Err(self.error(ParseErrorKind::DepthExceeded { max_depth: self.max_depth }));
		}
		Ok(next)
	}

	fn expect(&mut self, byte: u8) -> ReadResult<()> {
		if self.peek() != Some(byte) {
			return Err(self.unexpected());
		}
		self.pos += 1;
		Ok(())
	}

	fn scan_while(&mut self, keep: impl Fn(u8) -> bool) -> &'a str {
		let start = self.pos;
		while self.peek().is_some_and(&keep) {
			self.pos += 1;
		}
		&self.text[start..self.pos]
	}

	fn skip_ws(&mut self) {
		self.scan_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
	}

	fn peek(&self) -> Option<u8> {
		self.text.as_bytes().get(self.pos).copied()
	}

	fn peek_at(&self, offset: usize) -> Option<u8> {
		self.text.as_bytes().get(self.pos + offset).copied()
	}

	fn rest(&self) -> &'a str {
		&self.text[self.pos..]
	}

	fn error(&self, kind: ParseErrorKind) -> ParseError {
		ParseError::new(self.pos, kind)
	}

	fn unexpected(&self) -> ParseError {
		match self.rest().chars().next() {
			Some(found) => self.error(ParseErrorKind::UnexpectedChar { found }),
			None => self.error(ParseErrorKind::UnexpectedEof),
		}
	}

	fn invalid_number(&self, start: usize) -> ParseError {
		let end = self.pos.max(start + 1).min(self.text.len());
		ParseError::new(
			start,
			ParseErrorKind::InvalidNumber {
				text: self.text[start..end].to_owned(),
			},
		)
	}
}

fn invalid_literal(at: usize, what: &'static str, text: &str) -> ParseError {
	ParseError::new(
		at,
		ParseErrorKind::InvalidLiteral {
			what,
			text: text.to_owned(),
		},
	)
}
