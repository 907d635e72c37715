use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum VarcfgError {
	#[error(transparent)]
	#[diagnostic(code(varcfg::io_error))]
	Io(#[from] std::io::Error),

	#[error("no schema configured")]
	#[diagnostic(
		code(varcfg::missing_schema),
		help("pass `--schema <file>` or set `schema = \"schema.json\"` in varcfg.toml")
	)]
	MissingSchema,

	#[error("failed to load schema `{path}`: {reason}")]
	#[diagnostic(
		code(varcfg::schema_parse),
		help("a schema is a mapping of key names to `{{ type, default, description }}` descriptors")
	)]
	SchemaParse { path: String, reason: String },

	#[error("failed to load values `{path}`: {reason}")]
	#[diagnostic(
		code(varcfg::values_parse),
		help("a values file is a flat mapping of key names to booleans, numbers or strings")
	)]
	ValuesParse { path: String, reason: String },

	#[error("unsupported document format: `{0}`")]
	#[diagnostic(
		code(varcfg::unsupported_format),
		help("supported formats: json, yaml, yml, toml")
	)]
	UnsupportedFormat(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(varcfg::config_parse),
		help("check that varcfg.toml is valid TOML with `schema`, `values`, `variant` and [export] keys")
	)]
	ConfigParse(String),

	#[error("failed to serialize {format} export: {reason}")]
	#[diagnostic(code(varcfg::serialize))]
	Serialize { format: String, reason: String },

	#[error("refusing to write export with unsafe file name `{0}`")]
	#[diagnostic(
		code(varcfg::unsafe_file_name),
		help("variant names must not contain path separators or be `.`/`..`")
	)]
	UnsafeFileName(String),
}

pub type VarcfgResult<T> = Result<T, VarcfgError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
