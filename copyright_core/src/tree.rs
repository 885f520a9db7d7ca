use std::iter::FusedIterator;
use std::path::Path;
use std::path::PathBuf;

use regex::Regex;
use serde::Serialize;

use crate::CopyrightError;
use crate::CopyrightResult;
use crate::config::Config;
use crate::config::DEFAULTS;
use crate::config::ResolvedConfig;
use crate::config::load_dir;
use crate::config::merge;
use crate::config::resolve;

/// A file admitted by the include/exclude filters, with the configuration of
/// its directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
	pub path: PathBuf,
	pub config: ResolvedConfig,
}

/// Include/exclude regular expressions for bare file or directory names.
#[derive(Debug, Clone)]
pub struct NameFilter {
	include: Vec<Regex>,
	exclude: Vec<Regex>,
	/// Whether an empty include list admits every name.
	admit_when_empty: bool,
}

impl NameFilter {
	fn new(include: &[String], exclude: &[String], admit_when_empty: bool) -> CopyrightResult<Self> {
		Ok(Self {
			include: compile_patterns(include)?,
			exclude: compile_patterns(exclude)?,
			admit_when_empty,
		})
	}

	/// Filter for directory names. A directory is only excluded by an empty
	/// `include_dirs` list if something else says so.
	pub fn for_dirs(config: &ResolvedConfig) -> CopyrightResult<Self> {
		Self::new(&config.include_dirs, &config.exclude_dirs, true)
	}

	/// Filter for file names. An empty `include_files` list admits nothing.
	pub fn for_files(config: &ResolvedConfig) -> CopyrightResult<Self> {
		Self::new(&config.include_files, &config.exclude_files, false)
	}

	pub fn admits(&self, name: &str) -> bool {
		let included = if self.include.is_empty() {
			self.admit_when_empty
		} else {
			self.include.iter().any(|regex| regex.is_match(name))
		};

		included && !self.exclude.iter().any(|regex| regex.is_match(name))
	}
}

/// Patterns must match the whole name, so `.*\.py` does not admit `a.pyc`.
fn compile_patterns(patterns: &[String]) -> CopyrightResult<Vec<Regex>> {
	patterns
		.iter()
		.map(|pattern| {
			Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
				CopyrightError::InvalidPattern {
					pattern: pattern.clone(),
					reason: e.to_string(),
				}
			})
		})
		.collect()
}

fn bare_name(path: &Path) -> String {
	path.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_default()
}

/// Walk the tree under `path`, yielding every admitted file with its
/// configuration.
///
/// The configuration of `path` itself is resolved up front, so a missing path
/// or a missing root declaration fails here. Problems found further down the
/// tree, such as a malformed rc file, are yielded as errors and only that
/// directory is skipped.
pub fn iterate(path: &Path) -> CopyrightResult<TreeWalk> {
	let start = merge(&DEFAULTS, &resolve(path)?);

	if path.is_dir() {
		return Ok(TreeWalk {
			pending: vec![PendingDir {
				path: path.to_path_buf(),
				config: start,
				ancestors: Vec::new(),
			}],
			files: Vec::new().into_iter(),
			config: None,
			start_file: None,
		});
	}

	let config = start.resolved();
	let admitted = NameFilter::for_files(&config)?.admits(&bare_name(path));
	if !admitted {
		tracing::debug!(path = %path.display(), "file not admitted by its directory filters");
	}

	Ok(TreeWalk {
		pending: Vec::new(),
		files: Vec::new().into_iter(),
		config: None,
		start_file: admitted.then(|| {
			File {
				path: path.to_path_buf(),
				config,
			}
		}),
	})
}

/// A directory waiting to be opened.
#[derive(Debug)]
struct PendingDir {
	path: PathBuf,
	/// Effective configuration of the parent, or of the directory itself for
	/// the start of the walk.
	config: Config,
	/// Canonical paths of the directories above it in this walk. Empty only
	/// for the start.
	ancestors: Vec<PathBuf>,
}

/// Lazy depth-first walk returned by [`iterate`].
///
/// Each directory's files are yielded before its subdirectories are entered.
/// Siblings are visited in name order.
#[derive(Debug)]
pub struct TreeWalk {
	/// Directories still to open. The last entry is opened next.
	pending: Vec<PendingDir>,
	/// Admitted files of the open directory.
	files: std::vec::IntoIter<PathBuf>,
	/// Configuration of the open directory.
	config: Option<ResolvedConfig>,
	start_file: Option<File>,
}

impl TreeWalk {
	/// Read `dir`, queue its admitted subdirectories and keep its admitted
	/// files.
	///
	/// Only a directory that resolves to one of its own ancestors is a cycle.
	/// Two links to the same sibling directory are walked twice.
	fn open(&mut self, dir: &Path, config: &Config, ancestors: &[PathBuf]) -> CopyrightResult<()> {
		let canonical = dir.canonicalize()?;
		if ancestors.contains(&canonical) {
			return Err(CopyrightError::SymlinkCycle(dir.to_path_buf()));
		}

		let resolved = config.resolved();
		let dir_filter = NameFilter::for_dirs(&resolved)?;
		let file_filter = NameFilter::for_files(&resolved)?;

		let mut entries = std::fs::read_dir(dir)?
			.map(|entry| entry.map(|entry| entry.path()))
			.collect::<Result<Vec<_>, _>>()?;
		entries.sort();

		let mut files = Vec::new();
		let mut subdirs = Vec::new();
		for path in entries {
			let name = bare_name(&path);
			if path.is_dir() {
				if dir_filter.admits(&name) {
					subdirs.push(path);
				} else {
					tracing::trace!(path = %path.display(), "skipping directory");
				}
			} else if path.is_file() {
				if file_filter.admits(&name) {
					files.push(path);
				} else {
					tracing::trace!(path = %path.display(), "skipping file");
				}
			}
		}

		let mut lineage = ancestors.to_vec();
		lineage.push(canonical);
		for subdir in subdirs.into_iter().rev() {
			self.pending.push(PendingDir {
				path: subdir,
				config: config.clone(),
				ancestors: lineage.clone(),
			});
		}

		tracing::debug!(dir = %dir.display(), files = files.len(), "entered directory");
		self.files = files.into_iter();
		self.config = Some(resolved);

		Ok(())
	}
}

/// Effective configuration of `dir`, given the effective configuration of
/// its parent. A directory declaring `root: true` starts over from the
/// defaults.
fn child_config(dir: &Path, parent: &Config) -> CopyrightResult<Config> {
	let own = load_dir(dir)?;
	if own.root {
		return Ok(merge(&DEFAULTS, &own));
	}

	Ok(merge(parent, &own))
}

impl Iterator for TreeWalk {
	type Item = CopyrightResult<File>;

	fn next(&mut self) -> Option<Self::Item> {
		if let Some(file) = self.start_file.take() {
			return Some(Ok(file));
		}

		loop {
			if let Some(path) = self.files.next() {
				let config = self.config.clone()?;
				return Some(Ok(File { path, config }));
			}

			let PendingDir {
				path: dir,
				config: inherited,
				ancestors,
			} = self.pending.pop()?;
			let config = if ancestors.is_empty() {
				Ok(inherited)
			} else {
				child_config(&dir, &inherited)
			};

			let opened = config.and_then(|config| self.open(&dir, &config, &ancestors));
			if let Err(error) = opened {
				tracing::debug!(dir = %dir.display(), %error, "skipping directory");
				self.files = Vec::new().into_iter();
				return Some(Err(error));
			}
		}
	}
}

impl FusedIterator for TreeWalk {}

/// Drop duplicate paths and paths inside another listed path, so no file is
/// walked twice. The order of the remaining paths is preserved.
pub fn reduce_paths<I>(paths: I) -> Vec<PathBuf>
where
	I: IntoIterator<Item = PathBuf>,
{
	let keyed: Vec<(PathBuf, PathBuf)> = paths
		.into_iter()
		.map(|path| {
			let key = path.canonicalize().unwrap_or_else(|_| path.clone());
			(key, path)
		})
		.collect();

	let mut kept: Vec<&(PathBuf, PathBuf)> = Vec::new();
	for entry in &keyed {
		let (key, _) = entry;
		let covered = keyed.iter().any(|(other, _)| other != key && key.starts_with(other))
			|| kept.iter().any(|(other, _)| other == key);
		if !covered {
			kept.push(entry);
		}
	}

	kept.into_iter().map(|(_, path)| path.clone()).collect()
}
