use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use copyright_cli::Commands;
use copyright_cli::CopyrightCli;
use copyright_cli::OutputFormat;
use copyright_cli::PathArgs;
use copyright_cli::finder::find_paths;
use copyright_cli::git;
use copyright_core::AnyResult;
use copyright_core::CopyrightError;
use copyright_core::CopyrightResult;
use copyright_core::File;
use copyright_core::config::RC_FILE_CANDIDATES;
use copyright_core::config::rc_path;
use copyright_core::pipeline::Outcome;
use copyright_core::pipeline::Pipeline;
use copyright_core::tree::iterate;
use copyright_core::tree::reduce_paths;
use owo_colors::OwoColorize;
use serde::Serialize;
use similar::ChangeTag;
use similar::TextDiff;
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_CONFIG: &str = "\
# copyright configuration
# Directories below inherit every key they do not set themselves.
root: true
copyright: \"Copyright (c) {intervals}\"
include_dirs: [\".*\"]
exclude_dirs: [\"\\\\..*\", \"target\", \"node_modules\"]
include_files: [\".*\\\\.rs\", \".*\\\\.py\", \".*\\\\.ts\"]
exclude_files: []
simplify: true
exact: false
";

/// Machine-readable result of `check --format json`.
#[derive(Debug, Serialize)]
struct CheckReport {
	ok: bool,
	problems: usize,
	files: Vec<FileReport>,
}

#[derive(Debug, Serialize)]
struct FileReport {
	path: String,
	/// `outdated`, `notice_not_found` or `template_not_set`.
	status: String,
	changes: Vec<ChangeReport>,
}

#[derive(Debug, Serialize)]
struct ChangeReport {
	line: usize,
	change: String,
}

fn main() {
	let args = CopyrightCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_logging(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Init { path }) => run_init(path.as_deref()),
		Some(Commands::List { paths }) => run_list(paths),
		Some(Commands::Check {
			paths,
			diff,
			format,
		}) => run_check(paths, *diff, *format),
		Some(Commands::Fix { paths, dry_run }) => run_fix(paths, *dry_run),
		None => {
			eprintln!("No subcommand specified. Run `copyright --help` for usage.");
			process::exit(1);
		}
	};

	match result {
		Ok(0) => {}
		Ok(_) => process::exit(1),
		Err(e) => {
			match e.downcast::<CopyrightError>() {
				Ok(error) => {
					let report: miette::Report = (*error).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

fn init_logging(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.try_init()
		.ok();
}

/// Print a non-fatal error, naming the file it belongs to when there is one.
fn report_error(path: Option<&Path>, error: CopyrightError) {
	if let Some(path) = path {
		eprintln!("{}: {}", path.display(), colored!("error", red));
	}

	let report = miette::Report::new(error);
	eprintln!("{report:?}");
}

/// Visit every admitted file under the selected paths and return the number
/// of problems found.
///
/// Problems found while walking a path, including a malformed rc file above
/// it, are reported and counted and the next path is walked. Fatal errors,
/// such as a path without a root rc file, abort the run.
fn walk<F>(args: &PathArgs, mut visit: F) -> AnyResult<usize>
where
	F: FnMut(File) -> usize,
{
	let mut problems = 0;

	for path in reduce_paths(find_paths(args)?) {
		let files = match iterate(&path) {
			Ok(files) => files,
			Err(error) if error.is_fatal() => return Err(error.into()),
			Err(error) => {
				report_error(Some(&path), error);
				problems += 1;
				continue;
			}
		};

		for file in files {
			match file {
				Ok(file) => problems += visit(file),
				Err(error) if error.is_fatal() => return Err(error.into()),
				Err(error) => {
					report_error(None, error);
					problems += 1;
				}
			}
		}
	}

	Ok(problems)
}

/// Read `file` and run it through the pipeline.
fn examine(
	pipeline: &mut Pipeline,
	file: &File,
	current_year: i32,
) -> CopyrightResult<(String, Outcome)> {
	let text = std::fs::read_to_string(&file.path)?;
	let year = if file.config.exact {
		git::modification_year(&file.path, &file.config, current_year)
	} else {
		None
	};

	let outcome = pipeline.process(&text, &file.config, year)?;
	tracing::debug!(path = %file.path.display(), ?year, "processed file");

	Ok((text, outcome))
}

fn run_init(path: Option<&Path>) -> AnyResult<usize> {
	let dir = path.map_or_else(|| PathBuf::from("."), Path::to_path_buf);

	if let Some(existing) = rc_path(&dir) {
		println!("Config file already exists: {}", existing.display());
		return Ok(0);
	}

	let config_path = dir.join(RC_FILE_CANDIDATES[0]);
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created config file: {}", config_path.display());
	println!();
	println!("Next steps:");
	println!("  1. Edit the `copyright` template and the file filters");
	println!("  2. Run `copyright list` to see which files are checked");
	println!("  3. Run `copyright check` to find outdated notices");

	Ok(0)
}

fn run_list(args: &PathArgs) -> AnyResult<usize> {
	let mut count = 0;
	let problems = walk(args, |file| {
		println!("{}", file.path.display());
		count += 1;
		0
	})?;

	eprintln!("{count}");
	Ok(problems)
}

fn run_check(args: &PathArgs, show_diff: bool, format: OutputFormat) -> AnyResult<usize> {
	let mut pipeline = Pipeline::new();
	let current_year = git::current_year();
	let mut entries = Vec::new();

	let problems = walk(args, |file| {
		let (text, outcome) = match examine(&mut pipeline, &file, current_year) {
			Ok(examined) => examined,
			Err(error) => {
				report_error(Some(&file.path), error);
				return 1;
			}
		};
		let path = file.path.display();

		if let Some(reason) = outcome.skip_reason() {
			match format {
				OutputFormat::Text => println!("{path}: {reason}"),
				OutputFormat::Github => println!("::error file={path}::{reason}"),
				OutputFormat::Json => {
					entries.push(FileReport {
						path: path.to_string(),
						status: reason.replace(' ', "_"),
						changes: Vec::new(),
					});
				}
			}
			return 1;
		}

		let changes = outcome.changes();
		if changes.is_empty() {
			return 0;
		}

		match format {
			OutputFormat::Text => {
				for (line, change) in &changes {
					println!("{path}: {line}: {change}");
				}
			}
			OutputFormat::Github => {
				for (line, change) in &changes {
					println!("::error file={path},line={line}::{change}");
				}
			}
			OutputFormat::Json => {
				entries.push(FileReport {
					path: path.to_string(),
					status: "outdated".to_string(),
					changes: changes
						.iter()
						.map(|&(line, change)| {
							ChangeReport {
								line,
								change: change.to_string(),
							}
						})
						.collect(),
				});
			}
		}

		if show_diff {
			if let Outcome::Checked {
				fixed: Some(fixed), ..
			} = &outcome
			{
				print_diff(&text, fixed);
			}
		}

		changes.len()
	})?;

	if format == OutputFormat::Json {
		let report = CheckReport {
			ok: problems == 0,
			problems,
			files: entries,
		};
		println!("{}", serde_json::to_string_pretty(&report)?);
	}

	eprintln!("{problems}");
	Ok(problems)
}

fn run_fix(args: &PathArgs, dry_run: bool) -> AnyResult<usize> {
	let mut pipeline = Pipeline::new();
	let current_year = git::current_year();
	let mut fixed_count = 0;

	let problems = walk(args, |file| {
		let (text, outcome) = match examine(&mut pipeline, &file, current_year) {
			Ok(examined) => examined,
			Err(error) => {
				report_error(Some(&file.path), error);
				return 1;
			}
		};

		if let Some(reason) = outcome.skip_reason() {
			eprintln!("{}: {reason}", file.path.display());
			return 1;
		}

		let Outcome::Checked {
			fixed: Some(fixed), ..
		} = &outcome
		else {
			return 0;
		};

		if dry_run {
			println!("would fix {}", colored!(file.path.display(), bold));
			print_diff(&text, fixed);
			fixed_count += 1;
			return 0;
		}

		print!("fixing {}...", file.path.display());
		std::io::stdout().flush().ok();

		if let Err(error) = write_atomically(&file.path, fixed) {
			println!(" {}", colored!("failed", red));
			report_error(Some(&file.path), error.into());
			return 1;
		}

		println!(" {}", colored!("ok", green));
		fixed_count += 1;
		0
	})?;

	eprintln!("{fixed_count}");
	Ok(problems)
}

/// Replace `path` with `content` through a temporary file in the same
/// directory, keeping the original permissions.
fn write_atomically(path: &Path, content: &str) -> std::io::Result<()> {
	let dir = path
		.parent()
		.filter(|parent| !parent.as_os_str().is_empty())
		.unwrap_or(Path::new("."));
	let permissions = std::fs::metadata(path)?.permissions();

	let mut tmp = NamedTempFile::new_in(dir)?;
	tmp.write_all(content.as_bytes())?;
	tmp.as_file().set_permissions(permissions)?;
	tmp.persist(path).map_err(|e| e.error)?;

	Ok(())
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {}
		}
	}
}
