#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use copyright_core::AnyEmptyResult;
use insta_cmd::get_cargo_bin;

pub const ROOT_RC: &str = "root: true
copyright: 'Copyright (c) {intervals}'
include_files: ['.*\\.py']
simplify: true
";

pub fn copyright_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("copyright"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

/// Write `files` below `root`, creating parent directories as needed.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) -> AnyEmptyResult {
	for (path, content) in files {
		let path = root.join(path);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, content)?;
	}

	Ok(())
}
