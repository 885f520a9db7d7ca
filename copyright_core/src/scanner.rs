use std::iter::FusedIterator;
use std::ops::Range;

use regex::CaptureMatches;
use serde::Serialize;

use crate::CopyrightResult;
use crate::intervals::Interval;
use crate::intervals::parse_intervals;
use crate::pattern::INTERVALS_GROUP;
use crate::pattern::NoticePattern;

/// A copyright notice found in a text buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
	/// Byte range of the whole match.
	pub span: Range<usize>,
	/// The matched text.
	pub text: String,
	/// 1-indexed line of the first matched byte.
	pub line: usize,
	/// 1-indexed byte column of the first matched byte.
	pub column: usize,
	/// Byte range of the interval list, relative to `span.start`.
	pub intervals_span: Range<usize>,
	/// The interval list as written, e.g. `2018-2019, 2021`.
	pub intervals_text: String,
	/// Parsed intervals in document order.
	pub intervals: Vec<Interval>,
}

/// Pre-computed table of line-start byte offsets so each match position is a
/// binary search instead of a rescan of the buffer.
pub(crate) struct LineTable {
	/// `line_starts[0]` is always 0.
	line_starts: Vec<usize>,
}

impl LineTable {
	pub(crate) fn new(content: &str) -> Self {
		let mut line_starts = vec![0];
		for (i, byte) in content.bytes().enumerate() {
			if byte == b'\n' {
				line_starts.push(i + 1);
			}
		}
		Self { line_starts }
	}

	/// 1-indexed (line, column) of a byte offset.
	pub(crate) fn position(&self, offset: usize) -> (usize, usize) {
		let line_idx = match self.line_starts.binary_search(&offset) {
			Ok(exact) => exact,
			Err(insert) => insert.saturating_sub(1),
		};

		(line_idx + 1, offset - self.line_starts[line_idx] + 1)
	}

	/// Byte offset of a 1-indexed (line, column), if the line exists.
	pub(crate) fn offset(&self, line: usize, column: usize) -> Option<usize> {
		let start = self.line_starts.get(line.checked_sub(1)?)?;
		Some(start + column.checked_sub(1)?)
	}
}

/// Finds notices of one compiled template.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'p> {
	pattern: &'p NoticePattern,
}

impl<'p> Scanner<'p> {
	pub fn new(pattern: &'p NoticePattern) -> Self {
		Self { pattern }
	}

	/// Iterate over every non-overlapping notice in `text`, in document
	/// order. The iterator is consumed once; scan again for a fresh pass.
	pub fn scan<'t>(&self, text: &'t str) -> Notices<'p, 't> {
		Notices {
			captures: self.pattern.regex().captures_iter(text),
			text,
			lines: LineTable::new(text),
			done: false,
		}
	}
}

/// Single-pass iterator returned by [`Scanner::scan`].
pub struct Notices<'p, 't> {
	captures: CaptureMatches<'p, 't>,
	text: &'t str,
	lines: LineTable,
	done: bool,
}

impl Notices<'_, '_> {
	/// Whether a match ending in its interval list stopped short of a longer
	/// year or range, as in the `2020` of `2020-20245`.
	fn truncated(&self, intervals_end: usize, match_end: usize) -> bool {
		intervals_end == match_end
			&& self.text[match_end..]
				.chars()
				.next()
				.is_some_and(|c| c == '-' || c.is_ascii_digit())
	}
}

impl Iterator for Notices<'_, '_> {
	type Item = CopyrightResult<Notice>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}

		let (whole, intervals) = loop {
			let Some(captures) = self.captures.next() else {
				self.done = true;
				return None;
			};

			// Group 0 always participates in a match.
			let whole = captures.get(0)?;
			let intervals = captures.name(INTERVALS_GROUP)?;
			if !self.truncated(intervals.end(), whole.end()) {
				break (whole, intervals);
			}

			tracing::trace!(text = whole.as_str(), "skipping truncated notice");
		};

		let (line, column) = self.lines.position(whole.start());
		let notice = parse_intervals(intervals.as_str()).map(|parsed| {
			Notice {
				span: whole.range(),
				text: whole.as_str().to_string(),
				line,
				column,
				intervals_span: (intervals.start() - whole.start())
					..(intervals.end() - whole.start()),
				intervals_text: intervals.as_str().to_string(),
				intervals: parsed,
			}
		});

		Some(notice)
	}
}

impl FusedIterator for Notices<'_, '_> {}
