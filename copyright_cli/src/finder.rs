use std::path::PathBuf;

use copyright_core::AnyResult;

use crate::FindPath;
use crate::PathArgs;
use crate::git;

/// The paths a command starts from.
pub fn find_paths(args: &PathArgs) -> AnyResult<Vec<PathBuf>> {
	match args.find_path {
		FindPath::File => Ok(file_paths(&args.paths)),
		FindPath::Git => git::changed_paths(&args.paths, args.working(), args.staged()),
	}
}

/// The given paths, or the current directory when none are given.
pub fn file_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
	if paths.is_empty() {
		return vec![PathBuf::from(".")];
	}

	paths.to_vec()
}
