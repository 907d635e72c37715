use serde_json::json;

use crate::DefaultValue;
use crate::FieldSpec;
use crate::Schema;
use crate::ValueMap;

pub fn number(default: Option<i64>, description: Option<&str>) -> FieldSpec {
	FieldSpec::Number {
		default: default.map(|number| DefaultValue::Typed(number.into())),
		description: description.map(ToString::to_string),
	}
}

pub fn string(default: Option<&str>, description: Option<&str>) -> FieldSpec {
	FieldSpec::String {
		default: default.map(|text| DefaultValue::Typed(text.to_string())),
		description: description.map(ToString::to_string),
	}
}

pub fn boolean(default: Option<bool>, description: Option<&str>) -> FieldSpec {
	FieldSpec::Boolean {
		default: default.map(DefaultValue::Typed),
		description: description.map(ToString::to_string),
	}
}

/// A small keyer board schema covering every field kind.
pub fn board_schema() -> Schema {
	Schema::from_fields([
		("UART_BAUD", number(Some(115_200), Some("UART baud rate"))),
		("DEVICE_NAME", string(Some("keyer"), None)),
		(
			"ENABLE_LOG",
			boolean(Some(false), Some("Enable verbose\nlogging \\")),
		),
		("SERIAL", string(None, None)),
	])
}

/// Values for `board_schema` with one override, one string needing escapes,
/// and two keys the header cannot use.
pub fn board_values() -> ValueMap {
	ValueMap::from_schema(&board_schema())
		.with_value("UART_BAUD", json!(9600))
		.with_value("SERIAL", json!("A\"1\\"))
		.with_value("bad-key", json!(5))
		.with_value("UNKNOWN", json!(1))
}

pub const BOARD_SCHEMA_JSON: &str = r#"{
  "UART_BAUD": { "type": "number", "default": 115200, "description": "UART baud rate" },
  "DEVICE_NAME": { "type": "string", "default": "keyer" },
  "ENABLE_LOG": { "type": "boolean", "default": false },
  "SERIAL": { "type": "string" }
}"#;

pub const BOARD_VALUES_YAML: &str = "UART_BAUD: 9600\nSERIAL: \"K-001\"\n";
