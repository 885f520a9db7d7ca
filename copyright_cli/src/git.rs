use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use chrono::Datelike;
use copyright_core::AnyResult;
use copyright_core::ResolvedConfig;

/// The current year in local time.
pub fn current_year() -> i32 {
	chrono::Local::now().year()
}

fn git(dir: &Path) -> Command {
	let mut command = Command::new("git");
	command.current_dir(dir);
	command
}

fn execute(command: &mut Command) -> AnyResult<String> {
	let output = command.output()?;

	if !output.status.success() {
		let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
		let reason = if stderr.is_empty() {
			format!(
				"git exited with status {}",
				output
					.status
					.code()
					.map_or_else(|| "unknown".to_string(), |code| code.to_string())
			)
		} else {
			stderr
		};

		return Err(reason.into());
	}

	Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Directory to run git in for `path`, and the name to pass it.
fn locate(path: &Path) -> Option<(&Path, &Path)> {
	let name = Path::new(path.file_name()?);
	let dir = path
		.parent()
		.filter(|parent| !parent.as_os_str().is_empty())
		.unwrap_or(Path::new("."));

	Some((dir, name))
}

/// Paths with uncommitted changes, relative to the current directory.
///
/// `pathspecs` narrows the search; an empty list means the whole current
/// directory. Deleted paths are never returned.
pub fn changed_paths(pathspecs: &[PathBuf], working: bool, staged: bool) -> AnyResult<Vec<PathBuf>> {
	let cwd = std::env::current_dir()?;
	let mut paths = BTreeSet::new();

	for (enabled, cached) in [(working, false), (staged, true)] {
		if !enabled {
			continue;
		}

		let mut command = git(&cwd);
		command.args(["diff", "--name-only", "--relative", "--diff-filter=d"]);
		if cached {
			command.arg("--cached");
		}
		command.arg("--").args(pathspecs);

		let stdout = execute(&mut command).map_err(|e| format!("`git diff` failed: {e}"))?;
		paths.extend(
			stdout
				.lines()
				.filter(|line| !line.is_empty())
				.map(PathBuf::from),
		);
	}

	tracing::debug!(count = paths.len(), working, staged, "found changed paths");
	Ok(paths.into_iter().collect())
}

fn has_changes(path: &Path, cached: bool) -> bool {
	let Some((dir, name)) = locate(path) else {
		return false;
	};

	let mut command = git(dir);
	command.args(["diff", "--name-only"]);
	if cached {
		command.arg("--cached");
	}
	command.arg("--").arg(name);

	execute(&mut command).is_ok_and(|stdout| !stdout.trim().is_empty())
}

/// Year of the last commit touching `path`, if git knows the file.
pub fn last_commit_year(path: &Path) -> Option<i32> {
	let (dir, name) = locate(path)?;
	let mut command = git(dir);
	command
		.args(["log", "-1", "--format=%cd", "--date=format:%Y", "--"])
		.arg(name);

	match execute(&mut command) {
		Ok(stdout) => stdout.trim().parse().ok(),
		Err(error) => {
			tracing::debug!(path = %path.display(), %error, "no commit history");
			None
		}
	}
}

/// The year `path` was last modified, as far as version control can tell.
///
/// Uncommitted changes count as a modification in `current_year` when the
/// configuration asks for it. A file git knows nothing about falls back to
/// `current_year` only when `add_now` is set.
pub fn modification_year(path: &Path, config: &ResolvedConfig, current_year: i32) -> Option<i32> {
	if config.git_diff_working && has_changes(path, false) {
		tracing::trace!(path = %path.display(), "modified in the working tree");
		return Some(current_year);
	}

	if config.git_diff_staged && has_changes(path, true) {
		tracing::trace!(path = %path.display(), "modified in the index");
		return Some(current_year);
	}

	last_commit_year(path).or_else(|| config.add_now.then_some(current_year))
}
