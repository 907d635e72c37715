use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use serde_json::Value;

use crate::Schema;
use crate::ValueMap;
use crate::VarcfgError;
use crate::VarcfgResult;
use crate::normalize_value;

/// Formats a schema or values document can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
	Json,
	Yaml,
	Toml,
}

impl DocumentFormat {
	/// Detect the format from a file extension.
	pub fn from_path(path: &Path) -> VarcfgResult<Self> {
		let extension = path
			.extension()
			.and_then(|extension| extension.to_str())
			.unwrap_or("")
			.to_ascii_lowercase();

		extension.parse()
	}
}

impl FromStr for DocumentFormat {
	type Err = VarcfgError;

	fn from_str(format: &str) -> Result<Self, Self::Err> {
		match format.trim().to_ascii_lowercase().as_str() {
			"json" => Ok(Self::Json),
			"yaml" | "yml" => Ok(Self::Yaml),
			"toml" => Ok(Self::Toml),
			other => Err(VarcfgError::UnsupportedFormat(other.to_string())),
		}
	}
}

impl Display for DocumentFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Json => write!(f, "json"),
			Self::Yaml => write!(f, "yaml"),
			Self::Toml => write!(f, "toml"),
		}
	}
}

/// Parse document content into a `serde_json::Value`, preserving key order.
/// The error is the parser's message.
/// Integral floats are read as integers, so `1.0` and `1` load the same.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value, String> {
	let value = match format {
		DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string())?,
		DocumentFormat::Yaml => serde_yaml_ng::from_str(content).map_err(|e| e.to_string())?,
		DocumentFormat::Toml => {
			let value: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;
			toml_to_json(value)?
		}
	};

	Ok(normalize_value(value))
}

/// Parse schema content.
pub fn parse_schema(content: &str, format: DocumentFormat, source: &str) -> VarcfgResult<Schema> {
	let value = parse_document(content, format).map_err(|reason| {
		VarcfgError::SchemaParse {
			path: source.to_string(),
			reason,
		}
	})?;

	Schema::from_value(value, source)
}

/// Parse values content.
pub fn parse_values(content: &str, format: DocumentFormat, source: &str) -> VarcfgResult<ValueMap> {
	let value = parse_document(content, format).map_err(|reason| {
		VarcfgError::ValuesParse {
			path: source.to_string(),
			reason,
		}
	})?;

	ValueMap::from_value(value, source)
}

/// Read and parse a schema file. The format comes from the extension.
pub fn load_schema(path: &Path) -> VarcfgResult<Schema> {
	let source = path.display().to_string();
	let format = DocumentFormat::from_path(path)?;
	let content = std::fs::read_to_string(path).map_err(|e| {
		VarcfgError::SchemaParse {
			path: source.clone(),
			reason: e.to_string(),
		}
	})?;

	parse_schema(&content, format, &source)
}

/// Read and parse a values file. The format comes from the extension.
pub fn load_values(path: &Path) -> VarcfgResult<ValueMap> {
	let source = path.display().to_string();
	let format = DocumentFormat::from_path(path)?;
	let content = std::fs::read_to_string(path).map_err(|e| {
		VarcfgError::ValuesParse {
			path: source.clone(),
			reason: e.to_string(),
		}
	})?;

	parse_values(&content, format, &source)
}

/// Convert a `toml::Value` to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> Result<Value, String> {
	let json = match value {
		toml::Value::String(s) => Value::String(s),
		toml::Value::Integer(i) => Value::Number(i.into()),
		toml::Value::Float(f) => {
			Value::Number(
				serde_json::Number::from_f64(f)
					.ok_or_else(|| format!("unconvertible float value: {f}"))?,
			)
		}
		toml::Value::Boolean(b) => Value::Bool(b),
		toml::Value::Datetime(dt) => Value::String(dt.to_string()),
		toml::Value::Array(arr) => {
			let items: Result<Vec<Value>, String> = arr.into_iter().map(toml_to_json).collect();
			Value::Array(items?)
		}
		toml::Value::Table(table) => {
			let mut map = serde_json::Map::new();
			for (k, v) in table {
				map.insert(k, toml_to_json(v)?);
			}
			Value::Object(map)
		}
	};

	Ok(json)
}
