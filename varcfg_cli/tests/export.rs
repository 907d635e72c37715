mod common;

use similar_asserts::assert_eq;
use varcfg_core::AnyEmptyResult;

#[test]
fn export_writes_all_formats() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let mut cmd = common::varcfg_cmd();
	cmd.arg("export")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Exported 3 file(s) to generated."));

	let generated = tmp.path().join("generated");
	let header = std::fs::read_to_string(generated.join("board_a_final_cfg.h"))?;
	assert_eq!(header, common::EXPECTED_HEADER);

	let json: serde_json::Value =
		serde_json::from_str(&std::fs::read_to_string(generated.join("board_a.json"))?)?;
	assert_eq!(
		json,
		serde_json::json!({
			"UART_BAUD": 9600,
			"DEVICE_NAME": "board \"A\"",
			"ENABLE_LOG": false,
		})
	);

	let yaml = std::fs::read_to_string(generated.join("board_a.yaml"))?;
	assert!(yaml.starts_with("UART_BAUD: 9600\n"), "unexpected yaml: {yaml}");
	assert!(yaml.contains("ENABLE_LOG: false\n"));

	Ok(())
}

#[test]
fn export_json_keeps_schema_order() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let mut cmd = common::varcfg_cmd();
	cmd.arg("export")
		.arg("--path")
		.arg(tmp.path())
		.arg("--format")
		.arg("json")
		.assert()
		.success();

	let json = std::fs::read_to_string(tmp.path().join("generated").join("board_a.json"))?;
	assert_eq!(
		json,
		"{\n  \"UART_BAUD\": 9600,\n  \"DEVICE_NAME\": \"board \\\"A\\\"\",\n  \"ENABLE_LOG\": \
		 false\n}"
	);

	Ok(())
}

#[test]
fn export_selected_formats_only() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let mut cmd = common::varcfg_cmd();
	cmd.arg("export")
		.arg("--path")
		.arg(tmp.path())
		.arg("--format")
		.arg("header")
		.assert()
		.success()
		.stdout(predicates::str::contains("Exported 1 file(s)"));

	let generated = tmp.path().join("generated");
	assert!(generated.join("board_a_final_cfg.h").is_file());
	assert!(!generated.join("board_a.json").exists());
	assert!(!generated.join("board_a.yaml").exists());

	Ok(())
}

#[test]
fn export_to_custom_out_dir() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let mut cmd = common::varcfg_cmd();
	cmd.arg("export")
		.arg("--path")
		.arg(tmp.path())
		.arg("--out")
		.arg("build/config")
		.assert()
		.success();

	assert!(
		tmp.path()
			.join("build/config/board_a_final_cfg.h")
			.is_file()
	);

	Ok(())
}

#[test]
fn export_uses_config_export_table() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(
		tmp.path().join("varcfg.toml"),
		format!(
			"{}\n[export]\nout_dir = \"cfg\"\nformats = [\"yaml\"]\n",
			common::CONFIG_TOML
		),
	)?;

	let mut cmd = common::varcfg_cmd();
	cmd.arg("export")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert!(tmp.path().join("cfg/board_a.yaml").is_file());
	assert!(!tmp.path().join("cfg/board_a.json").exists());

	Ok(())
}

#[test]
fn export_to_stdout_prints_raw_header() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let mut cmd = common::varcfg_cmd();
	let output = cmd
		.arg("export")
		.arg("--path")
		.arg(tmp.path())
		.arg("--format")
		.arg("header")
		.arg("--stdout")
		.output()?;

	assert!(output.status.success());
	assert_eq!(String::from_utf8(output.stdout)?, common::EXPECTED_HEADER);
	assert!(!tmp.path().join("generated").exists());

	Ok(())
}

#[test]
fn export_to_stdout_separates_artifacts() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let mut cmd = common::varcfg_cmd();
	cmd.arg("export")
		.arg("--path")
		.arg(tmp.path())
		.arg("--stdout")
		.assert()
		.success()
		.stdout(predicates::str::contains("==> board_a.json <=="))
		.stdout(predicates::str::contains("==> board_a.yaml <=="))
		.stdout(predicates::str::contains("==> board_a_final_cfg.h <=="));

	Ok(())
}

#[test]
fn export_variant_flag_overrides_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let mut cmd = common::varcfg_cmd();
	cmd.arg("export")
		.arg("--path")
		.arg(tmp.path())
		.arg("--variant")
		.arg("board_b")
		.arg("--format")
		.arg("header")
		.assert()
		.success();

	let header =
		std::fs::read_to_string(tmp.path().join("generated").join("board_b_final_cfg.h"))?;
	assert!(header.contains("// Variant: board_b\n"));

	Ok(())
}

#[test]
fn export_without_values_uses_defaults() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("schema.json"), common::SCHEMA_JSON)?;

	let mut cmd = common::varcfg_cmd();
	cmd.arg("export")
		.arg("--path")
		.arg(tmp.path())
		.arg("--schema")
		.arg("schema.json")
		.arg("--format")
		.arg("json")
		.assert()
		.success();

	let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(
		tmp.path().join("generated").join("variant.json"),
	)?)?;
	assert_eq!(
		json,
		serde_json::json!({
			"UART_BAUD": 115_200,
			"DEVICE_NAME": "keyer",
			"ENABLE_LOG": false,
		})
	);

	Ok(())
}

#[test]
fn export_warns_about_skipped_keys() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(
		tmp.path().join("values.yaml"),
		"UART_BAUD: 9600\nbad-key: 1\nUNDESCRIBED: 2\n",
	)?;

	let mut cmd = common::varcfg_cmd();
	let output = cmd
		.arg("export")
		.arg("--path")
		.arg(tmp.path())
		.arg("--format")
		.arg("header")
		.output()?;

	assert!(output.status.success());
	let stderr = String::from_utf8(output.stderr)?;
	assert!(stderr.contains("skipping key"), "stderr: {stderr}");
	assert!(stderr.contains("bad-key"), "stderr: {stderr}");
	assert!(stderr.contains("UNDESCRIBED"), "stderr: {stderr}");

	let header =
		std::fs::read_to_string(tmp.path().join("generated").join("board_a_final_cfg.h"))?;
	assert!(!header.contains("bad-key"));
	assert!(!header.contains("UNDESCRIBED"));

	Ok(())
}

#[test]
fn export_fails_without_schema() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = common::varcfg_cmd();
	cmd.arg("export")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("varcfg::missing_schema"));

	Ok(())
}

#[test]
fn export_reports_unparseable_schema() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(tmp.path().join("schema.json"), "{ not json")?;

	let mut cmd = common::varcfg_cmd();
	cmd.arg("export")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("schema.json"));

	Ok(())
}
