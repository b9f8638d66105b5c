use std::fmt;

use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// Millisecond-precision UTC instant, the payload of `D"..."` literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(OffsetDateTime);

impl Instant {
	/// Unix epoch.
	pub const EPOCH: Self = Self(OffsetDateTime::UNIX_EPOCH);

	/// Normalize to UTC and truncate below milliseconds; years outside `0..=9999` are rejected.
	pub fn from_datetime(value: OffsetDateTime) -> Option<Self> {
		let utc = value.to_offset(UtcOffset::UTC);
		if !(0..=9999).contains(&utc.year()) {
			return None;
		}
		let truncated = utc.replace_millisecond(utc.millisecond()).ok()?;
		Some(Self(truncated))
	}

	/// Build from milliseconds since the Unix epoch.
	pub fn from_unix_millis(millis: i64) -> Option<Self> {
		let nanos = i128::from(millis) * 1_000_000;
		Self::from_datetime(OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?)
	}

	/// Parse RFC 3339 / ISO-8601 text with an explicit offset.
	pub fn parse_iso(text: &str) -> Option<Self> {
		Self::from_datetime(OffsetDateTime::parse(text, &Rfc3339).ok()?)
	}

	/// Milliseconds since the Unix epoch.
	pub fn unix_millis(self) -> i64 {
		i64::try_from(self.0.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
	}

	/// Underlying UTC date-time.
	pub fn as_datetime(self) -> OffsetDateTime {
		self.0
	}
}

impl fmt::Display for Instant {
	/// Renders `YYYY-MM-DDTHH:MM:SS.mmmZ`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let value = self.0;
		write!(
			f,
			"{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
			value.year(),
			u8::from(value.month()),
			value.day(),
			value.hour(),
			value.minute(),
			value.second(),
			value.millisecond()
		)
	}
}
