use crate::CopyrightResult;
use crate::analyzer::Analyzer;
use crate::analyzer::Update;
use crate::apply::apply_to_string;
use crate::config::ResolvedConfig;
use crate::pattern::PatternCache;
use crate::scanner::Scanner;

/// What processing one file produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Outcome {
	/// No `copyright` template is configured for the file.
	TemplateNotSet,
	/// The template compiled but the file contains no notice.
	NoticeNotFound,
	/// Every notice was analysed.
	Checked {
		updates: Vec<Update>,
		/// The rewritten text, when at least one update has changes.
		fixed: Option<String>,
	},
}

impl Outcome {
	/// `(line, change)` for every change, in order.
	pub fn changes(&self) -> Vec<(usize, &str)> {
		match self {
			Self::Checked { updates, .. } => {
				updates
					.iter()
					.flat_map(|update| {
						update
							.changes
							.iter()
							.map(move |change| (update.notice.line, change.as_str()))
					})
					.collect()
			}
			_ => Vec::new(),
		}
	}

	/// The reason a file was skipped, if it was.
	pub fn skip_reason(&self) -> Option<&'static str> {
		match self {
			Self::TemplateNotSet => Some("template not set"),
			Self::NoticeNotFound => Some("notice not found"),
			Self::Checked { .. } => None,
		}
	}
}

/// Runs pattern → scan → analyse → apply for one file at a time, reusing
/// compiled patterns across files.
#[derive(Debug, Default)]
pub struct Pipeline {
	patterns: PatternCache,
}

impl Pipeline {
	pub fn new() -> Self {
		Self::default()
	}

	/// Process the text of one file.
	///
	/// `year` is the file's last modification year; it is only needed when
	/// the configuration sets `exact`.
	pub fn process(
		&mut self,
		text: &str,
		config: &ResolvedConfig,
		year: Option<i32>,
	) -> CopyrightResult<Outcome> {
		let Some(template) = config.copyright.as_deref() else {
			return Ok(Outcome::TemplateNotSet);
		};

		let pattern = self.patterns.get(template)?;
		let notices = Scanner::new(pattern)
			.scan(text)
			.collect::<CopyrightResult<Vec<_>>>()?;

		if notices.is_empty() {
			return Ok(Outcome::NoticeNotFound);
		}

		let updates = Analyzer::from_config(config)
			.with_year(year)
			.analyse(notices)
			.collect::<CopyrightResult<Vec<_>>>()?;

		let fixed = if updates.iter().all(Update::is_empty) {
			None
		} else {
			Some(apply_to_string(text, &updates)?)
		};

		Ok(Outcome::Checked { updates, fixed })
	}
}
