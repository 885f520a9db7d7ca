mod common;

use copyright_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

use crate::common::ROOT_RC;
use crate::common::copyright_cmd;
use crate::common::write_tree;

#[test]
fn check_passes_when_notices_are_correct() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), &[
		(".copyrightrc.yaml", ROOT_RC),
		("main.py", "# Copyright (c) 2018-2022\nprint()\n"),
	])?;

	copyright_cmd()
		.current_dir(tmp.path())
		.arg("check")
		.assert()
		.success()
		.stdout(predicates::str::is_empty())
		.stderr(predicates::str::contains("0"));

	Ok(())
}

#[test]
fn check_reports_each_change() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), &[
		(".copyrightrc.yaml", ROOT_RC),
		("main.py", "# Copyright (c) 2020, 2021, 2022\nprint()\n"),
	])?;

	let output = copyright_cmd()
		.current_dir(tmp.path())
		.arg("check")
		.output()?;
	assert_eq!(output.status.code(), Some(1));
	insta::assert_snapshot!(String::from_utf8(output.stdout)?, @r"
./main.py: 1: merge 2020 and 2021 into 2020-2021
./main.py: 1: merge 2020-2021 and 2022 into 2020-2022
");
	assert_eq!(String::from_utf8(output.stderr)?.trim(), "2");

	// Nothing is written by `check`.
	let content = std::fs::read_to_string(tmp.path().join("main.py"))?;
	assert_eq!(content, "# Copyright (c) 2020, 2021, 2022\nprint()\n");

	Ok(())
}

#[test]
fn check_reports_missing_notice_and_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), &[
		(".copyrightrc.yaml", ROOT_RC),
		("plain.py", "print()\n"),
		(
			"untemplated/.copyrightrc.yaml",
			"root: true\ninclude_files: ['.*\\.py']\n",
		),
		("untemplated/other.py", "# Copyright (c) 2020\n"),
	])?;

	copyright_cmd()
		.current_dir(tmp.path())
		.arg("check")
		.assert()
		.code(1)
		.stdout(predicates::str::contains("./plain.py: notice not found"))
		.stdout(predicates::str::contains(
			"./untemplated/other.py: template not set",
		));

	Ok(())
}

#[test]
fn check_respects_directory_filters() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), &[
		(
			".copyrightrc.yaml",
			"root: true\ncopyright: 'Copyright (c) {intervals}'\ninclude_files: ['.*\\.py']\nexclude_dirs: ['vendor']\n",
		),
		("vendor/lib.py", "print()\n"),
		("src/.copyrightrc.yaml", "exclude_files: ['generated\\.py']\n"),
		("src/generated.py", "print()\n"),
		("src/app.py", "# Copyright (c) 2021\n"),
	])?;

	copyright_cmd()
		.current_dir(tmp.path())
		.arg("check")
		.assert()
		.success()
		.stdout(predicates::str::is_empty());

	Ok(())
}

#[test]
fn check_without_root_config_is_fatal() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), &[("main.py", "# Copyright (c) 2020\n")])?;

	copyright_cmd()
		.current_dir(tmp.path())
		.arg("check")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("copyright::no_root_config"));

	Ok(())
}

#[test]
fn check_reports_broken_rc_and_continues() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), &[
		(".copyrightrc.yaml", ROOT_RC),
		("broken/.copyrightrc.yaml", "colour: red\n"),
		("broken/skipped.py", "print()\n"),
		("fine/main.py", "# Copyright (c) 2020, 2021\n"),
	])?;

	copyright_cmd()
		.current_dir(tmp.path())
		.arg("check")
		.assert()
		.code(1)
		.stderr(predicates::str::contains("copyright::config_parse"))
		.stdout(predicates::str::contains("./fine/main.py: 1: merge"))
		.stdout(predicates::str::contains("skipped.py").not());

	Ok(())
}

#[test]
fn check_broken_start_path_does_not_stop_other_paths() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), &[
		("bad/.copyrightrc.yaml", "root: [\n"),
		("bad/x.py", "# Copyright (c) 2020\n"),
		("good/.copyrightrc.yaml", ROOT_RC),
		("good/y.py", "# Copyright (c) 2020-2020\n"),
	])?;

	copyright_cmd()
		.current_dir(tmp.path())
		.args(["check", "bad", "good"])
		.assert()
		.code(1)
		.stderr(predicates::str::contains("bad: error"))
		.stderr(predicates::str::contains("copyright::config_parse"))
		.stdout(predicates::str::contains(
			"good/y.py: 1: collapse 2020-2020 to 2020",
		))
		.stdout(predicates::str::contains("x.py").not());

	Ok(())
}

#[test]
fn check_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), &[
		(".copyrightrc.yaml", ROOT_RC),
		("a.py", "# Copyright (c) 2021-2020\n"),
		("b.py", "print()\n"),
		("c.py", "# Copyright (c) 2020\n"),
	])?;

	let output = copyright_cmd()
		.current_dir(tmp.path())
		.arg("check")
		.arg("--format")
		.arg("json")
		.output()?;
	assert_eq!(output.status.code(), Some(1));

	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(false));
	assert_eq!(json["problems"], 2);

	let files = json["files"].as_array().ok_or("files should be an array")?;
	assert_eq!(files.len(), 2);
	assert_eq!(files[0]["path"], "./a.py");
	assert_eq!(files[0]["status"], "outdated");
	assert_eq!(files[0]["changes"][0]["line"], 1);
	assert_eq!(
		files[0]["changes"][0]["change"],
		"reverse 2021-2020 to 2020-2021"
	);
	assert_eq!(files[1]["path"], "./b.py");
	assert_eq!(files[1]["status"], "notice_not_found");

	Ok(())
}

#[test]
fn check_github_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), &[
		(".copyrightrc.yaml", ROOT_RC),
		("main.py", "\n# Copyright (c) 2020-2020\n"),
	])?;

	copyright_cmd()
		.current_dir(tmp.path())
		.arg("check")
		.arg("--format=github")
		.assert()
		.code(1)
		.stdout(predicates::str::contains(
			"::error file=./main.py,line=2::collapse 2020-2020 to 2020",
		));

	Ok(())
}

#[test]
fn check_diff_shows_fix() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), &[
		(".copyrightrc.yaml", ROOT_RC),
		("main.py", "# Copyright (c) 2020, 2021\nprint()\n"),
	])?;

	copyright_cmd()
		.current_dir(tmp.path())
		.arg("check")
		.arg("--diff")
		.assert()
		.code(1)
		.stderr(predicates::str::contains("-# Copyright (c) 2020, 2021"))
		.stderr(predicates::str::contains("+# Copyright (c) 2020-2021"));

	Ok(())
}

#[test]
fn check_exact_uses_current_year_for_unknown_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), &[
		(
			".copyrightrc.yaml",
			"root: true\ncopyright: 'Copyright (c) {intervals}'\ninclude_files: ['.*\\.py']\nexact: true\nadd_now: true\n",
		),
		("main.py", "# Copyright (c) 2000\n"),
	])?;
	let year = copyright_cli::git::current_year();

	copyright_cmd()
		.current_dir(tmp.path())
		.arg("check")
		.assert()
		.code(1)
		.stdout(predicates::str::contains(format!(
			"./main.py: 1: expand 2000 to 2000-{year}"
		)));

	Ok(())
}

#[test]
fn check_exact_without_year_is_reported() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_tree(tmp.path(), &[
		(
			".copyrightrc.yaml",
			"root: true\ncopyright: 'Copyright (c) {intervals}'\ninclude_files: ['.*\\.py']\nexact: true\n",
		),
		("main.py", "# Copyright (c) 2000\n"),
	])?;

	copyright_cmd()
		.current_dir(tmp.path())
		.arg("check")
		.assert()
		.code(1)
		.stderr(predicates::str::contains("copyright::no_freshness_signal"));

	Ok(())
}
