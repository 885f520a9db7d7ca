use std::ops::Range;

use crate::CopyrightError;
use crate::CopyrightResult;
use crate::analyzer::Update;
use crate::scanner::LineTable;

struct Edit {
	range: Range<usize>,
	replacement: String,
	line: usize,
	column: usize,
}

/// Rewrite the notices named by `updates` and return the resulting lines,
/// each with its original line terminator.
///
/// Notices are located by the line and column recorded when they were
/// scanned, and the text found there must still be the scanned text.
/// Everything outside the rewritten notices is left byte-identical. Updates
/// without changes are skipped.
pub fn apply(text: &str, updates: &[Update]) -> CopyrightResult<Vec<String>> {
	let lines = LineTable::new(text);
	let mut edits = Vec::new();

	for update in updates.iter().filter(|update| !update.is_empty()) {
		let notice = &update.notice;
		let not_found = || {
			CopyrightError::SpanNotFound {
				line: notice.line,
				column: notice.column,
			}
		};

		let start = lines
			.offset(notice.line, notice.column)
			.ok_or_else(not_found)?;
		let end = start + notice.text.len();
		if text.get(start..end) != Some(notice.text.as_str()) {
			return Err(not_found());
		}

		edits.push(Edit {
			range: start..end,
			replacement: update.replacement(),
			line: notice.line,
			column: notice.column,
		});
	}

	edits.sort_by_key(|edit| edit.range.start);
	if let Some(pair) = edits
		.windows(2)
		.find(|pair| pair[1].range.start < pair[0].range.end)
	{
		return Err(CopyrightError::SpanNotFound {
			line: pair[1].line,
			column: pair[1].column,
		});
	}

	// Back to front so earlier offsets stay valid.
	let mut output = text.to_string();
	for edit in edits.iter().rev() {
		output.replace_range(edit.range.clone(), &edit.replacement);
	}

	Ok(output.split_inclusive('\n').map(str::to_string).collect())
}

/// [`apply`], joined back into a single string.
pub fn apply_to_string(text: &str, updates: &[Update]) -> CopyrightResult<String> {
	Ok(apply(text, updates)?.concat())
}
