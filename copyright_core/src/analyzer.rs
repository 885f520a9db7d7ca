use std::iter::FusedIterator;

use serde::Serialize;

use crate::CopyrightError;
use crate::CopyrightResult;
use crate::config::ResolvedConfig;
use crate::intervals::Interval;
use crate::intervals::format_intervals;
use crate::intervals::upper_bound;
use crate::scanner::Notice;

/// The corrections needed for one notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Update {
	pub notice: Notice,
	/// One human-readable line per correction, in the order they were
	/// applied. Empty when the notice is already correct.
	pub changes: Vec<String>,
	/// The intervals after every correction.
	pub intervals: Vec<Interval>,
}

impl Update {
	/// `true` when nothing needs to change.
	pub fn is_empty(&self) -> bool {
		self.changes.is_empty()
	}

	/// The corrected notice text.
	pub fn replacement(&self) -> String {
		if self.is_empty() {
			return self.notice.text.clone();
		}

		let mut text = self.notice.text.clone();
		text.replace_range(
			self.notice.intervals_span.clone(),
			&format_intervals(&self.intervals),
		);
		text
	}
}

/// Decides what has to change in each notice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Analyzer {
	/// Rewrite intervals to their most compact form.
	pub simplify: bool,
	/// Require the last year to equal [`Analyzer::year`].
	pub exact: bool,
	/// The year the file was last modified, supplied by version control.
	pub year: Option<i32>,
}

impl Analyzer {
	pub fn new(simplify: bool, exact: bool) -> Self {
		Self {
			simplify,
			exact,
			year: None,
		}
	}

	pub fn from_config(config: &ResolvedConfig) -> Self {
		Self::new(config.simplify, config.exact)
	}

	#[must_use]
	pub fn with_year(mut self, year: impl Into<Option<i32>>) -> Self {
		self.year = year.into();
		self
	}

	/// Lazily analyse each notice in turn.
	pub fn analyse<I>(&self, notices: I) -> Updates<I::IntoIter>
	where
		I: IntoIterator<Item = Notice>,
	{
		Updates {
			analyzer: *self,
			notices: notices.into_iter(),
		}
	}

	/// Analyse a single notice.
	///
	/// Fails with [`CopyrightError::NoFreshnessSignal`] when `exact` is set
	/// but no year is known.
	pub fn analyse_notice(&self, notice: Notice) -> CopyrightResult<Update> {
		let mut intervals = notice.intervals.clone();
		let mut changes = Vec::new();

		fix_structure(&mut intervals, &mut changes);

		if self.simplify {
			simplify(&mut intervals, &mut changes);
		}

		if self.exact {
			let year = self
				.year
				.ok_or(CopyrightError::NoFreshnessSignal { line: notice.line })?;
			let before = changes.len();
			make_exact(&mut intervals, year, &mut changes);

			if self.simplify && changes.len() > before {
				simplify(&mut intervals, &mut changes);
			}
		}

		tracing::trace!(line = notice.line, changes = changes.len(), "analysed notice");

		Ok(Update {
			notice,
			changes,
			intervals,
		})
	}
}

/// Reverse backwards ranges, then put intervals in ascending order.
fn fix_structure(intervals: &mut [Interval], changes: &mut Vec<String>) {
	for interval in intervals.iter_mut().filter(|interval| interval.is_reversed()) {
		let fixed = Interval {
			start: interval.end,
			end: interval.start,
			ranged: true,
		};
		changes.push(format!("reverse {interval} to {fixed}"));
		*interval = fixed;
	}

	if !intervals.is_sorted_by_key(|interval| (interval.start, interval.end)) {
		let before = format_intervals(intervals);
		intervals.sort_by_key(|interval| (interval.start, interval.end));
		changes.push(format!("sort {before} to {}", format_intervals(intervals)));
	}
}

/// Collapse `2020-2020` ranges and merge neighbours that overlap or touch.
/// Expects sorted input, which makes merging neighbours enough.
fn simplify(intervals: &mut Vec<Interval>, changes: &mut Vec<String>) {
	for interval in intervals
		.iter_mut()
		.filter(|interval| interval.is_degenerate())
	{
		let fixed = Interval::year(interval.start);
		changes.push(format!("collapse {interval} to {fixed}"));
		*interval = fixed;
	}

	let mut index = 0;
	while index + 1 < intervals.len() {
		let current = intervals[index];
		let next = intervals[index + 1];

		if current.touches(&next) {
			let merged = current.union(&next);
			changes.push(format!("merge {current} and {next} into {merged}"));
			intervals[index] = merged;
			intervals.remove(index + 1);
		} else {
			index += 1;
		}
	}
}

/// Make the latest year equal `year`.
fn make_exact(intervals: &mut [Interval], year: i32, changes: &mut Vec<String>) {
	let Some(upper) = upper_bound(intervals) else {
		return;
	};

	if upper < year {
		let Some(index) = intervals.iter().rposition(|interval| interval.end == upper) else {
			return;
		};
		let current = intervals[index];
		let expanded = Interval::new(current.start, year);
		changes.push(format!("expand {current} to {expanded}"));
		intervals[index] = expanded;
		return;
	}

	for interval in intervals.iter_mut().filter(|interval| interval.end > year) {
		let current = *interval;
		if current.start <= year {
			*interval = Interval::new(current.start, year);
			changes.push(format!("truncate {current} to {interval}"));
		} else {
			*interval = Interval::year(year);
			changes.push(format!("replace {current} with {interval}"));
		}
	}
}

/// Single-pass iterator returned by [`Analyzer::analyse`].
#[derive(Debug)]
pub struct Updates<I> {
	analyzer: Analyzer,
	notices: I,
}

impl<I> Iterator for Updates<I>
where
	I: Iterator<Item = Notice>,
{
	type Item = CopyrightResult<Update>;

	fn next(&mut self) -> Option<Self::Item> {
		let notice = self.notices.next()?;
		Some(self.analyzer.analyse_notice(notice))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.notices.size_hint()
	}
}

impl<I> FusedIterator for Updates<I> where I: FusedIterator<Item = Notice> {}
