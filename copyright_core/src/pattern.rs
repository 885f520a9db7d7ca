use std::collections::HashMap;

use regex::Regex;

use crate::CopyrightError;
use crate::CopyrightResult;
use crate::scanner::Scanner;

/// The token a template uses to mark where the years go.
pub const INTERVALS_PLACEHOLDER: &str = "{intervals}";

/// Name of the capture group holding the interval text.
pub const INTERVALS_GROUP: &str = "intervals";

const YEAR: &str = "[0-9]{4}";

/// A compiled notice template.
#[derive(Debug, Clone)]
pub struct NoticePattern {
	template: String,
	regex: Regex,
}

impl NoticePattern {
	/// The template this pattern was built from.
	pub fn template(&self) -> &str {
		&self.template
	}

	pub fn regex(&self) -> &Regex {
		&self.regex
	}

	/// Whether `text` contains at least one notice.
	pub fn is_match(&self, text: &str) -> bool {
		Scanner::new(self).scan(text).next().is_some()
	}
}

/// Build the matcher for a notice template such as
/// `Copyright (c) {intervals} Example Corp.`.
///
/// Literal text is matched verbatim. The placeholder matches one or more
/// comma separated years or year ranges and is exposed as the `intervals`
/// capture group.
pub fn notice_pattern(template: &str) -> CopyrightResult<NoticePattern> {
	let invalid = |reason: &str| {
		CopyrightError::PatternTemplate {
			template: template.to_string(),
			reason: reason.to_string(),
		}
	};

	let mut parts = template.split(INTERVALS_PLACEHOLDER);
	let (Some(before), Some(after), None) = (parts.next(), parts.next(), parts.next()) else {
		return Err(if template.contains(INTERVALS_PLACEHOLDER) {
			invalid("the `{intervals}` placeholder appears more than once")
		} else {
			invalid("the `{intervals}` placeholder is missing")
		});
	};

	let interval = format!("{YEAR}(?:-{YEAR})?");
	let mut source = format!(
		"{}(?P<{INTERVALS_GROUP}>{interval}(?:,[ \\t]*{interval})*)",
		regex::escape(before)
	);
	// Stop `2020` from matching the front of `20201`.
	if after
		.chars()
		.next()
		.is_none_or(|c| !c.is_alphanumeric() && c != '_')
	{
		source.push_str(r"\b");
	}
	source.push_str(&regex::escape(after));

	let regex = Regex::new(&source).map_err(|e| invalid(&e.to_string()))?;
	tracing::trace!(template, pattern = regex.as_str(), "compiled notice pattern");

	Ok(NoticePattern {
		template: template.to_string(),
		regex,
	})
}

/// Compiled patterns keyed by template, so a template shared by many files is
/// only compiled once.
#[derive(Debug, Default)]
pub struct PatternCache {
	patterns: HashMap<String, NoticePattern>,
}

impl PatternCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Get the compiled pattern for `template`, compiling it on first use.
	/// Failed compilations are not cached.
	pub fn get(&mut self, template: &str) -> CopyrightResult<&NoticePattern> {
		if !self.patterns.contains_key(template) {
			let pattern = notice_pattern(template)?;
			self.patterns.insert(template.to_string(), pattern);
		}

		Ok(&self.patterns[template])
	}

	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}
}
