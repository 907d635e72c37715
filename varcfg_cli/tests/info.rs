mod common;

use clap::CommandFactory;
use clap::Parser;
use varcfg_cli::Commands;
use varcfg_cli::FormatArg;
use varcfg_cli::VarcfgCli;
use varcfg_core::AnyEmptyResult;
use varcfg_core::ExportFormat;

#[test]
fn cli_definition_is_valid() {
	VarcfgCli::command().debug_assert();
}

#[test]
fn parses_repeated_formats() -> AnyEmptyResult {
	let cli = VarcfgCli::try_parse_from([
		"varcfg", "export", "-f", "yaml", "--format", "header", "--variant", "board_a",
	])?;

	let Some(Commands::Export { formats, .. }) = &cli.command else {
		return Err("expected the export command".into());
	};
	assert_eq!(formats, &[FormatArg::Yaml, FormatArg::Header]);

	let options = cli.context_options(None, formats);
	assert_eq!(options.formats, vec![ExportFormat::Yaml, ExportFormat::Header]);
	assert_eq!(options.variant.as_deref(), Some("board_a"));

	Ok(())
}

#[test]
fn stdout_conflicts_with_out() {
	let result = VarcfgCli::try_parse_from(["varcfg", "export", "--stdout", "--out", "dist"]);
	assert!(result.is_err());
}

#[test]
fn info_summarizes_project() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let mut cmd = common::varcfg_cmd();
	cmd.arg("info")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("varcfg info"))
		.stdout(predicates::str::is_match(r"Resolved config\s+varcfg\.toml")?)
		.stdout(predicates::str::is_match(r"Variant\s+board_a")?)
		.stdout(predicates::str::is_match(r"Fields\s+3")?)
		.stdout(predicates::str::is_match(r"UART_BAUD\s+number = 115200")?)
		.stdout(predicates::str::is_match(r"Unknown keys\s+none")?)
		.stdout(predicates::str::is_match(r"Skipped keys\s+0")?);

	Ok(())
}

#[test]
fn info_lists_skipped_keys_and_dropped_descriptors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(
		tmp.path().join("schema.json"),
		r#"{
	"UART_BAUD": { "type": "number", "default": 115200 },
	"BROKEN": { "type": "float" }
}"#,
	)?;
	std::fs::write(tmp.path().join("values.yaml"), "UART_BAUD: 9600\nEXTRA: 1\n")?;

	let mut cmd = common::varcfg_cmd();
	cmd.arg("info")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::is_match(r"Unknown keys\s+EXTRA")?)
		.stdout(predicates::str::is_match(
			r"EXTRA\s+not described by the schema \(override\)",
		)?)
		.stdout(predicates::str::is_match(r"Dropped descriptors\s+1")?)
		.stderr(predicates::str::contains("dropped descriptor `BROKEN`"));

	Ok(())
}

#[test]
fn info_keeps_fields_with_mismatched_defaults() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(
		tmp.path().join("schema.json"),
		r#"{ "MASK": { "type": "number", "default": "0x10" } }"#,
	)?;
	std::fs::write(tmp.path().join("values.yaml"), "")?;

	let mut cmd = common::varcfg_cmd();
	cmd.arg("info")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::is_match(r"Fields\s+1")?)
		.stdout(predicates::str::is_match(r"Dropped descriptors\s+0")?)
		.stdout(predicates::str::is_match(r"Lenient defaults\s+1")?)
		.stderr(predicates::str::contains("lenient default for `MASK`"));

	let output = common::varcfg_cmd()
		.arg("export")
		.arg("--path")
		.arg(tmp.path())
		.arg("--format")
		.arg("header")
		.arg("--stdout")
		.output()?;
	assert!(output.status.success());
	assert!(String::from_utf8(output.stdout)?.contains("#ifndef MASK\n#define MASK 0x10\n#endif\n"));

	Ok(())
}
