use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

pub mod finder;
pub mod git;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Keep copyright notices and their years correct across a source tree.",
	long_about = "copyright finds the copyright notice described by the nearest \
	              `.copyrightrc.yaml` in every file of a tree and checks that the years it \
	              records are ordered, compact and up to date.\n\nQuick start:\n  copyright \
	              init   Create a root rc file\n  copyright list   Show the files that are \
	              checked\n  copyright check  Report outdated notices\n  copyright fix    \
	              Rewrite outdated notices"
)]
pub struct CopyrightCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a root `.copyrightrc.yaml` in the given directory.
	///
	/// If an rc file already exists, this command is a no-op and exits
	/// successfully.
	Init {
		/// Directory to initialize. Defaults to the current directory.
		path: Option<PathBuf>,
	},
	/// List every file the include and exclude filters admit.
	///
	/// Files are printed one per line on stdout; the number of files is
	/// printed on stderr.
	List {
		#[command(flatten)]
		paths: PathArgs,
	},
	/// Report files whose notice is missing or needs a change.
	///
	/// Prints one line per change as `path: line: change`, and the number
	/// of problems on stderr. Exits with a non-zero status code when any
	/// problem is found, which makes it suitable for CI and pre-commit
	/// hooks.
	Check {
		#[command(flatten)]
		paths: PathArgs,

		/// Show a unified diff of the fix for each outdated file.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results. Use `text` for human-readable
		/// output, `json` for programmatic consumption, or `github` for
		/// GitHub Actions annotations that appear inline on PRs.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Rewrite outdated notices in place.
	///
	/// Only the notices themselves are changed; every other byte of a file
	/// is kept. Files are replaced atomically. Files without a template or
	/// without a notice are reported and make the command fail.
	Fix {
		#[command(flatten)]
		paths: PathArgs,

		/// Print the diff of every fix without writing any file.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
}

/// Which paths a command works on.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct PathArgs {
	/// Files or directories. With `--find-path file` these default to the
	/// current directory; with `--find-path git` they limit the changed
	/// paths that are considered.
	pub paths: Vec<PathBuf>,

	/// How to find the paths to process.
	#[arg(long, value_enum, default_value_t = FindPath::File)]
	pub find_path: FindPath,

	/// With `--find-path git`, include files with unstaged changes.
	#[arg(long, overrides_with = "git_path_no_working")]
	pub git_path_working: bool,

	/// With `--find-path git`, skip files with unstaged changes.
	#[arg(long, overrides_with = "git_path_working")]
	pub git_path_no_working: bool,

	/// With `--find-path git`, include files with staged changes.
	#[arg(long, overrides_with = "git_path_no_staged")]
	pub git_path_staged: bool,

	/// With `--find-path git`, skip files with staged changes.
	#[arg(long, overrides_with = "git_path_staged")]
	pub git_path_no_staged: bool,
}

impl PathArgs {
	/// Working tree changes are included unless `--git-path-no-working` was
	/// the last of the pair given.
	pub fn working(&self) -> bool {
		!self.git_path_no_working
	}

	/// Staged changes are included unless `--git-path-no-staged` was the
	/// last of the pair given.
	pub fn staged(&self) -> bool {
		!self.git_path_no_staged
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FindPath {
	/// Use the given paths as they are.
	File,
	/// Use the paths git reports as changed.
	Git,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each entry includes the
	/// file path, its status and the changes with their line numbers.
	Json,
	/// GitHub Actions annotation format. Emits `::error` annotations that
	/// appear inline on pull request diffs.
	Github,
}
