#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const SCHEMA_JSON: &str = r#"{
	"UART_BAUD": { "type": "number", "default": 115200, "description": "UART baud rate" },
	"DEVICE_NAME": { "type": "string", "default": "keyer" },
	"ENABLE_LOG": { "type": "boolean", "default": false }
}
"#;

pub const VALUES_YAML: &str = "UART_BAUD: 9600\nDEVICE_NAME: 'board \"A\"'\n";

pub const CONFIG_TOML: &str =
	"schema = \"schema.json\"\nvalues = \"values.yaml\"\nvariant = \"board_a\"\n";

pub const EXPECTED_HEADER: &str = r#"#pragma once
// Auto-generated by varcfg. Do not edit.
// Variant: board_a

#define UART_BAUD 9600
#define DEVICE_NAME "board \"A\""
#define ENABLE_LOG 0

// UART baud rate
#ifndef UART_BAUD
#define UART_BAUD 115200
#endif
#ifndef DEVICE_NAME
#define DEVICE_NAME "keyer"
#endif
#ifndef ENABLE_LOG
#define ENABLE_LOG 0
#endif
"#;

pub fn varcfg_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("varcfg"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("VARCFG_LOG");
	cmd
}

/// Write a schema, values file and `varcfg.toml` for the `board_a` variant.
pub fn write_project(root: &Path) -> std::io::Result<()> {
	std::fs::write(root.join("schema.json"), SCHEMA_JSON)?;
	std::fs::write(root.join("values.yaml"), VALUES_YAML)?;
	std::fs::write(root.join("varcfg.toml"), CONFIG_TOML)?;
	Ok(())
}
