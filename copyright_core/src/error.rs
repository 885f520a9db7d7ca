use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum CopyrightError {
	#[error(transparent)]
	#[diagnostic(code(copyright::io_error))]
	Io(#[from] std::io::Error),

	#[error("`{}` does not exist", .0.display())]
	#[diagnostic(
		code(copyright::config_not_found),
		help("check the path arguments passed to `copyright`")
	)]
	ConfigNotFound(PathBuf),

	#[error("`{}` is not a directory", .0.display())]
	#[diagnostic(code(copyright::not_a_directory))]
	NotADirectory(PathBuf),

	#[error("failed to parse config file `{}`: {reason}", .path.display())]
	#[diagnostic(
		code(copyright::config_parse),
		help(
			"the rc file must be a YAML mapping using the keys root, copyright, include_files, \
			 exclude_files, include_dirs, exclude_dirs, simplify, exact, add_now, \
			 git_diff_working and git_diff_staged"
		)
	)]
	ConfigParse { path: PathBuf, reason: String },

	#[error("invalid name pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(copyright::invalid_pattern),
		help("include/exclude entries are regular expressions matched against bare names")
	)]
	InvalidPattern { pattern: String, reason: String },

	#[error("symlink cycle detected at: `{}`", .0.display())]
	#[diagnostic(
		code(copyright::symlink_cycle),
		help("remove the circular symlink or exclude the directory with `exclude_dirs`")
	)]
	SymlinkCycle(PathBuf),

	#[error("root config for `{}` not found", .0.display())]
	#[diagnostic(
		code(copyright::no_root_config),
		help("add `root: true` to the `.copyrightrc.yaml` at the top of your project")
	)]
	NoRootConfig(PathBuf),

	#[error("invalid copyright template `{template}`: {reason}")]
	#[diagnostic(
		code(copyright::pattern_template),
		help("the template must contain the `{{intervals}}` placeholder exactly once")
	)]
	PatternTemplate { template: String, reason: String },

	#[error("invalid year interval list `{0}`")]
	#[diagnostic(
		code(copyright::invalid_intervals),
		help("use comma separated years or year ranges, e.g. `2018-2020, 2022`")
	)]
	InvalidIntervals(String),

	#[error("notice at line {line}, column {column} no longer matches the text")]
	#[diagnostic(
		code(copyright::span_not_found),
		help("the text must not change between scanning and applying updates")
	)]
	SpanNotFound { line: usize, column: usize },

	#[error("no last modification year is available for the notice at line {line}")]
	#[diagnostic(
		code(copyright::no_freshness_signal),
		help("commit the file, or set `add_now: true` to use the current year")
	)]
	NoFreshnessSignal { line: usize },
}

impl CopyrightError {
	/// Errors that mean the whole invocation is misconfigured, rather than a
	/// single file being broken.
	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::NoRootConfig(_) | Self::ConfigNotFound(_))
	}
}

pub type CopyrightResult<T> = Result<T, CopyrightError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
