use std::path::Path;
use std::path::PathBuf;

use crate::DEFAULT_OUT_DIR;
use crate::ExportFormat;
use crate::Schema;
use crate::ValueMap;
use crate::VarcfgConfig;
use crate::VarcfgError;
use crate::VarcfgResult;
use crate::load_schema;
use crate::load_values;

/// Command line overrides applied on top of `varcfg.toml`.
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
	pub schema: Option<PathBuf>,
	pub values: Option<PathBuf>,
	pub variant: Option<String>,
	pub out_dir: Option<PathBuf>,
	pub formats: Vec<ExportFormat>,
}

/// A loaded schema and value snapshot, ready to be exported or previewed.
#[derive(Debug, Clone)]
pub struct VariantContext {
	/// The project root.
	pub root: PathBuf,
	/// The config file that was used, if any.
	pub config_path: Option<PathBuf>,
	/// The schema file that was loaded.
	pub schema_path: PathBuf,
	/// The values file that was applied, if any.
	pub values_path: Option<PathBuf>,
	pub schema: Schema,
	/// Schema defaults with the values file applied on top.
	pub values: ValueMap,
	/// The variant name. May be empty.
	pub variant: String,
	/// Directory exports are written to.
	pub out_dir: PathBuf,
	/// Formats to export.
	pub formats: Vec<ExportFormat>,
}

/// Load the config at `root`, apply `options` on top, and load the schema and
/// values it points at.
pub fn load_variant_context(root: &Path, options: &ContextOptions) -> VarcfgResult<VariantContext> {
	let config_path = VarcfgConfig::resolve_path(root);
	let config = VarcfgConfig::load(root)?.unwrap_or_default();

	let schema_path = options
		.schema
		.clone()
		.or(config.schema)
		.map(|path| root.join(path))
		.ok_or(VarcfgError::MissingSchema)?;
	let values_path = options
		.values
		.clone()
		.or(config.values)
		.map(|path| root.join(path));
	let variant = options
		.variant
		.clone()
		.or(config.variant)
		.unwrap_or_default();
	let out_dir = root.join(
		options
			.out_dir
			.clone()
			.or(config.export.out_dir)
			.unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
	);

	let mut formats = if options.formats.is_empty() {
		config.export.formats
	} else {
		options.formats.clone()
	};
	if formats.is_empty() {
		formats = ExportFormat::ALL.to_vec();
	}
	formats.sort();
	formats.dedup();

	let schema = load_schema(&schema_path)?;
	let mut values = ValueMap::from_schema(&schema);
	if let Some(path) = &values_path {
		values = values.overlay(&load_values(path)?);
	}

	tracing::debug!(
		schema = %schema_path.display(),
		fields = schema.len(),
		values = values.len(),
		variant = %variant,
		"loaded variant context"
	);

	Ok(VariantContext {
		root: root.to_path_buf(),
		config_path,
		schema_path,
		values_path,
		schema,
		values,
		variant,
		out_dir,
		formats,
	})
}
