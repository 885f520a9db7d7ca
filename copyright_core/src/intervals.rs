use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::CopyrightError;

/// A single year (`2020`) or an inclusive year range (`2020-2024`).
///
/// `start` may be greater than `end` when the source text is reversed; the
/// analyzer reports and fixes that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
	pub start: i32,
	pub end: i32,
	/// Whether the interval is written as `start-end`. Keeps `2020-2020`
	/// distinguishable from `2020`.
	pub ranged: bool,
}

impl Interval {
	/// Build an interval in its natural form: a bare year when `start` and
	/// `end` agree, a range otherwise.
	pub fn new(start: i32, end: i32) -> Self {
		Self {
			start,
			end,
			ranged: start != end,
		}
	}

	pub fn year(year: i32) -> Self {
		Self::new(year, year)
	}

	pub fn is_reversed(&self) -> bool {
		self.start > self.end
	}

	/// A range written with the same year on both sides.
	pub fn is_degenerate(&self) -> bool {
		self.ranged && self.start == self.end
	}

	/// Whether `next`, which starts no earlier than `self`, overlaps or
	/// directly follows `self`.
	pub fn touches(&self, next: &Interval) -> bool {
		next.start <= self.end.saturating_add(1)
	}

	/// The smallest interval covering both.
	pub fn union(&self, other: &Interval) -> Interval {
		Interval::new(self.start.min(other.start), self.end.max(other.end))
	}
}

impl fmt::Display for Interval {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.ranged {
			write!(f, "{}-{}", self.start, self.end)
		} else {
			write!(f, "{}", self.start)
		}
	}
}

impl FromStr for Interval {
	type Err = CopyrightError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || CopyrightError::InvalidIntervals(s.to_string());
		let token = s.trim();

		match token.split_once('-') {
			Some((start, end)) => {
				Ok(Interval {
					start: parse_year(start).ok_or_else(invalid)?,
					end: parse_year(end).ok_or_else(invalid)?,
					ranged: true,
				})
			}
			None => parse_year(token).map(Interval::year).ok_or_else(invalid),
		}
	}
}

fn parse_year(text: &str) -> Option<i32> {
	let text = text.trim();
	if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}

	text.parse().ok()
}

/// Parse a comma separated interval list such as `2018-2019, 2021`.
pub fn parse_intervals(text: &str) -> Result<Vec<Interval>, CopyrightError> {
	if text.trim().is_empty() {
		return Err(CopyrightError::InvalidIntervals(text.to_string()));
	}

	text.split(',').map(str::parse).collect()
}

/// Render intervals the way they are written back into a notice.
pub fn format_intervals(intervals: &[Interval]) -> String {
	intervals
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(", ")
}

/// The latest year covered by any interval.
pub fn upper_bound(intervals: &[Interval]) -> Option<i32> {
	intervals
		.iter()
		.map(|interval| interval.end.max(interval.start))
		.max()
}
