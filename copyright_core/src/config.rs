use std::ops::BitOr;
use std::path::Path;
use std::path::PathBuf;
use std::sync::LazyLock;

use serde::Deserialize;
use serde::Serialize;

use crate::CopyrightError;
use crate::CopyrightResult;

/// Supported rc file names in discovery order (highest precedence first).
pub const RC_FILE_CANDIDATES: [&str; 2] = [".copyrightrc.yaml", ".copyrightrc.yml"];

/// Configuration declared by one directory's rc file.
///
/// Every field except `root` is optional: an absent field inherits the value
/// of the nearest ancestor that declares it, falling back to [`DEFAULTS`].
///
/// ```yaml
/// root: true
/// copyright: "Copyright (c) {intervals} Example Corp."
/// include_dirs: [".*"]
/// exclude_dirs: ["target", "\\..*"]
/// include_files: [".*\\.rs"]
/// simplify: true
/// exact: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Marks the top of the inheritance chain. Never inherited.
	pub root: bool,
	/// Notice template containing the `{intervals}` placeholder.
	pub copyright: Option<String>,
	pub include_files: Option<Vec<String>>,
	pub exclude_files: Option<Vec<String>>,
	pub include_dirs: Option<Vec<String>>,
	pub exclude_dirs: Option<Vec<String>>,
	/// Rewrite year intervals to their most compact form.
	pub simplify: Option<bool>,
	/// Require the last year to equal the file's last modification year.
	pub exact: Option<bool>,
	/// Use the current year for files version control knows nothing about.
	pub add_now: Option<bool>,
	/// Treat uncommitted working tree changes as a modification this year.
	pub git_diff_working: Option<bool>,
	/// Treat staged changes as a modification this year.
	pub git_diff_staged: Option<bool>,
}

/// The base every resolved configuration is merged onto.
pub static DEFAULTS: LazyLock<Config> = LazyLock::new(|| {
	Config {
		root: false,
		copyright: None,
		include_files: Some(Vec::new()),
		exclude_files: Some(Vec::new()),
		include_dirs: Some(Vec::new()),
		exclude_dirs: Some(Vec::new()),
		simplify: Some(false),
		exact: Some(false),
		add_now: Some(false),
		git_diff_working: Some(true),
		git_diff_staged: Some(true),
	}
});

/// Merge `other` on top of `base`.
///
/// Fields present in `other` win. `root` is always taken from `other`.
pub fn merge(base: &Config, other: &Config) -> Config {
	Config {
		root: other.root,
		copyright: other.copyright.clone().or_else(|| base.copyright.clone()),
		include_files: other
			.include_files
			.clone()
			.or_else(|| base.include_files.clone()),
		exclude_files: other
			.exclude_files
			.clone()
			.or_else(|| base.exclude_files.clone()),
		include_dirs: other
			.include_dirs
			.clone()
			.or_else(|| base.include_dirs.clone()),
		exclude_dirs: other
			.exclude_dirs
			.clone()
			.or_else(|| base.exclude_dirs.clone()),
		simplify: other.simplify.or(base.simplify),
		exact: other.exact.or(base.exact),
		add_now: other.add_now.or(base.add_now),
		git_diff_working: other.git_diff_working.or(base.git_diff_working),
		git_diff_staged: other.git_diff_staged.or(base.git_diff_staged),
	}
}

impl BitOr for &Config {
	type Output = Config;

	fn bitor(self, other: Self) -> Config {
		merge(self, other)
	}
}

impl BitOr for Config {
	type Output = Config;

	fn bitor(self, other: Config) -> Config {
		merge(&self, &other)
	}
}

/// A configuration with every inheritable field filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ResolvedConfig {
	pub root: bool,
	/// `None` means no notice is enforced for this file.
	pub copyright: Option<String>,
	pub include_files: Vec<String>,
	pub exclude_files: Vec<String>,
	pub include_dirs: Vec<String>,
	pub exclude_dirs: Vec<String>,
	pub simplify: bool,
	pub exact: bool,
	pub add_now: bool,
	pub git_diff_working: bool,
	pub git_diff_staged: bool,
}

impl Config {
	/// Merge onto [`DEFAULTS`] and drop the optionality.
	pub fn resolved(&self) -> ResolvedConfig {
		let Config {
			root,
			copyright,
			include_files,
			exclude_files,
			include_dirs,
			exclude_dirs,
			simplify,
			exact,
			add_now,
			git_diff_working,
			git_diff_staged,
		} = merge(&DEFAULTS, self);

		ResolvedConfig {
			root,
			copyright,
			include_files: include_files.unwrap_or_default(),
			exclude_files: exclude_files.unwrap_or_default(),
			include_dirs: include_dirs.unwrap_or_default(),
			exclude_dirs: exclude_dirs.unwrap_or_default(),
			simplify: simplify.unwrap_or_default(),
			exact: exact.unwrap_or_default(),
			add_now: add_now.unwrap_or_default(),
			git_diff_working: git_diff_working.unwrap_or(true),
			git_diff_staged: git_diff_staged.unwrap_or(true),
		}
	}
}

/// Resolve the rc file path for a directory from the known candidates.
pub fn rc_path(dir: &Path) -> Option<PathBuf> {
	RC_FILE_CANDIDATES
		.iter()
		.map(|candidate| dir.join(candidate))
		.find(|path| path.is_file())
}

/// Parse rc file content. `path` is only used for error reporting.
pub fn parse(content: &str, path: &Path) -> CopyrightResult<Config> {
	if content.trim().is_empty() {
		return Ok(Config::default());
	}

	let config: Option<Config> =
		serde_yaml_ng::from_str(content).map_err(|e| CopyrightError::ConfigParse {
			path: path.to_path_buf(),
			reason: e.to_string(),
		})?;

	Ok(config.unwrap_or_default())
}

/// Load a single rc file.
pub fn load(path: &Path) -> CopyrightResult<Config> {
	let content = std::fs::read_to_string(path)?;
	parse(&content, path)
}

/// Load the rc file of `dir` without looking at its ancestors. A directory
/// without an rc file declares nothing.
pub fn load_dir(dir: &Path) -> CopyrightResult<Config> {
	match rc_path(dir) {
		Some(path) => {
			tracing::trace!(path = %path.display(), "loading rc file");
			load(&path)
		}
		None => Ok(Config::default()),
	}
}

/// Resolve the configuration chain for `path`, from the nearest directory
/// declaring `root: true` down to `path` itself.
///
/// The returned config always has `root` set. It is not merged with
/// [`DEFAULTS`]; use [`Config::resolved`] for that.
pub fn resolve(path: &Path) -> CopyrightResult<Config> {
	if !path.exists() {
		return Err(CopyrightError::ConfigNotFound(path.to_path_buf()));
	}

	let canonical = path.canonicalize()?;
	let mut dir = if canonical.is_dir() {
		canonical.as_path()
	} else {
		canonical
			.parent()
			.ok_or_else(|| CopyrightError::NoRootConfig(path.to_path_buf()))?
	};
	let mut accumulated = Config::default();

	loop {
		let declared = load_dir(dir)?;
		let is_root = declared.root;
		// The accumulated, more specific data overrides the ancestor.
		accumulated = merge(&declared, &accumulated);

		if is_root {
			tracing::debug!(path = %path.display(), root = %dir.display(), "resolved config");
			accumulated.root = true;
			return Ok(accumulated);
		}

		match dir.parent() {
			Some(parent) if parent != dir => dir = parent,
			_ => return Err(CopyrightError::NoRootConfig(path.to_path_buf())),
		}
	}
}

/// Resolve the configuration of a directory.
pub fn for_dir(dir: &Path) -> CopyrightResult<Config> {
	if !dir.is_dir() {
		return Err(CopyrightError::NotADirectory(dir.to_path_buf()));
	}

	resolve(dir)
}

/// Resolve the configuration of a regular file.
pub fn for_file(file: &Path) -> CopyrightResult<Config> {
	if !file.is_file() {
		return Err(CopyrightError::ConfigNotFound(file.to_path_buf()));
	}

	resolve(file)
}

/// Resolve the configuration of a file or directory.
pub fn for_path(path: &Path) -> CopyrightResult<Config> {
	if path.is_dir() {
		for_dir(path)
	} else {
		for_file(path)
	}
}
