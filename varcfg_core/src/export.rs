use std::fmt::Display;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::Schema;
use crate::ValueMap;
use crate::VarcfgError;
use crate::VarcfgResult;
use crate::generate_header;
use crate::normalize_value;
use crate::variant_name;

/// The artifacts a variant can be exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
	Json,
	Yaml,
	Header,
}

impl ExportFormat {
	/// Every format, in export order.
	pub const ALL: [ExportFormat; 3] = [Self::Json, Self::Yaml, Self::Header];

	/// The file name of the artifact for `variant`. An empty variant name
	/// falls back to `variant`.
	pub fn file_name(self, variant: &str) -> String {
		let name = variant_name(variant);
		match self {
			Self::Json => format!("{name}.json"),
			Self::Yaml => format!("{name}.yaml"),
			Self::Header => format!("{name}_final_cfg.h"),
		}
	}
}

impl Display for ExportFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Json => write!(f, "json"),
			Self::Yaml => write!(f, "yaml"),
			Self::Header => write!(f, "header"),
		}
	}
}

impl FromStr for ExportFormat {
	type Err = VarcfgError;

	fn from_str(format: &str) -> Result<Self, Self::Err> {
		match format.trim().to_ascii_lowercase().as_str() {
			"json" => Ok(Self::Json),
			"yaml" | "yml" => Ok(Self::Yaml),
			"header" | "h" | "c" => Ok(Self::Header),
			other => Err(VarcfgError::UnsupportedFormat(other.to_string())),
		}
	}
}

/// A rendered export, ready to hand to an [`ExportSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
	pub format: ExportFormat,
	/// Suggested file name, derived from the variant name.
	pub file_name: String,
	/// UTF-8 payload.
	pub contents: String,
}

/// Serialize the value mapping as JSON with two-space indentation.
/// Integral floats are written as integers.
pub fn export_json(values: &ValueMap) -> VarcfgResult<String> {
	serde_json::to_string_pretty(&normalized(values)).map_err(|e| {
		VarcfgError::Serialize {
			format: ExportFormat::Json.to_string(),
			reason: e.to_string(),
		}
	})
}

/// Serialize the value mapping as a YAML mapping.
pub fn export_yaml(values: &ValueMap) -> VarcfgResult<String> {
	serde_yaml_ng::to_string(&normalized(values)).map_err(|e| {
		VarcfgError::Serialize {
			format: ExportFormat::Yaml.to_string(),
			reason: e.to_string(),
		}
	})
}

fn normalized(values: &ValueMap) -> Value {
	normalize_value(Value::Object((**values).clone()))
}

/// Render the raw C header. Unlike the preview, the header body is never
/// HTML-escaped.
pub fn export_header(schema: &Schema, values: &ValueMap, variant: &str) -> String {
	generate_header(schema, values, variant)
}

/// Render one artifact. Values are exported as they are, including `null`
/// for unset keys.
pub fn export_artifact(
	format: ExportFormat,
	schema: &Schema,
	values: &ValueMap,
	variant: &str,
) -> VarcfgResult<ExportArtifact> {
	let contents = match format {
		ExportFormat::Json => export_json(values)?,
		ExportFormat::Yaml => export_yaml(values)?,
		ExportFormat::Header => export_header(schema, values, variant),
	};

	Ok(ExportArtifact {
		format,
		file_name: format.file_name(variant),
		contents,
	})
}

/// Render every requested format, in the order given.
pub fn export_all(
	formats: &[ExportFormat],
	schema: &Schema,
	values: &ValueMap,
	variant: &str,
) -> VarcfgResult<Vec<ExportArtifact>> {
	formats
		.iter()
		.map(|format| export_artifact(*format, schema, values, variant))
		.collect()
}

/// Receives rendered artifacts and persists them somewhere.
pub trait ExportSink {
	/// Persist one artifact. Returns a human readable location.
	fn write_artifact(&mut self, artifact: &ExportArtifact) -> VarcfgResult<String>;
}

/// Writes artifacts as files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
	root: PathBuf,
}

impl DirectorySink {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// The path an artifact with `file_name` would be written to.
	pub fn path_for(&self, file_name: &str) -> VarcfgResult<PathBuf> {
		if !is_safe_file_name(file_name) {
			return Err(VarcfgError::UnsafeFileName(file_name.to_string()));
		}

		Ok(self.root.join(file_name))
	}
}

impl ExportSink for DirectorySink {
	fn write_artifact(&mut self, artifact: &ExportArtifact) -> VarcfgResult<String> {
		let path = self.path_for(&artifact.file_name)?;
		std::fs::create_dir_all(&self.root)?;

		let temp_path = path.with_file_name(format!(
			".{}.tmp-{}-{}",
			artifact.file_name,
			std::process::id(),
			std::time::SystemTime::now()
				.duration_since(UNIX_EPOCH)
				.map_or(0, |duration| duration.as_nanos())
		));

		std::fs::write(&temp_path, &artifact.contents)?;
		if let Err(e) = std::fs::rename(&temp_path, &path) {
			let _ = std::fs::remove_file(&temp_path);
			return Err(e.into());
		}

		tracing::debug!(path = %path.display(), format = %artifact.format, "wrote export");
		Ok(path.display().to_string())
	}
}

/// Collects artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
	pub artifacts: Vec<ExportArtifact>,
}

impl ExportSink for MemorySink {
	fn write_artifact(&mut self, artifact: &ExportArtifact) -> VarcfgResult<String> {
		self.artifacts.push(artifact.clone());
		Ok(artifact.file_name.clone())
	}
}

/// Hand every artifact to the sink, returning the reported locations.
pub fn write_artifacts(
	artifacts: &[ExportArtifact],
	sink: &mut dyn ExportSink,
) -> VarcfgResult<Vec<String>> {
	artifacts
		.iter()
		.map(|artifact| sink.write_artifact(artifact))
		.collect()
}

fn is_safe_file_name(file_name: &str) -> bool {
	!file_name.is_empty()
		&& file_name != "."
		&& file_name != ".."
		&& !file_name.contains(['/', '\\', '\0'])
}
