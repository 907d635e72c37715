use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ExportFormat;
use crate::VarcfgError;
use crate::VarcfgResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"varcfg.toml",
	".varcfg.toml",
	".config/varcfg.toml",
];

/// Default directory exports are written to, relative to the project root.
pub const DEFAULT_OUT_DIR: &str = "generated";

/// Configuration loaded from a `varcfg.toml` file.
///
/// ```toml
/// schema = "schema.json"
/// values = "variants/board_a.yaml"
/// variant = "board_a"
///
/// [export]
/// out_dir = "generated"
/// formats = ["json", "yaml", "header"]
/// ```
///
/// Relative paths are resolved against the project root, not against the
/// directory holding the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VarcfgConfig {
	/// Path to the schema document.
	#[serde(default)]
	pub schema: Option<PathBuf>,
	/// Path to the values document applied on top of the schema defaults.
	#[serde(default)]
	pub values: Option<PathBuf>,
	/// Variant name used for the header comment and export file names.
	#[serde(default)]
	pub variant: Option<String>,
	/// Export settings.
	#[serde(default)]
	pub export: ExportConfig,
}

/// The `[export]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
	/// Directory exports are written to. Defaults to `generated`.
	#[serde(default)]
	pub out_dir: Option<PathBuf>,
	/// Formats to export. Empty means all of them.
	#[serde(default)]
	pub formats: Vec<ExportFormat>,
}

impl VarcfgConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> VarcfgResult<Option<VarcfgConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	/// Parse config file content.
	pub fn parse(content: &str) -> VarcfgResult<VarcfgConfig> {
		toml::from_str(content).map_err(|e| VarcfgError::ConfigParse(e.to_string()))
	}
}
