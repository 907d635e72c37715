use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use varcfg_core::ContextOptions;
use varcfg_core::ExportFormat;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Fill in a configuration schema and export it as JSON, YAML or a layered C header.",
	long_about = "varcfg turns a configuration schema and a set of variant values into JSON, YAML \
	              and a C header where variant values override #ifndef-guarded schema \
	              defaults.\n\nQuick start:\n  varcfg init     Create a sample schema and \
	              varcfg.toml\n  varcfg export   Write all exports for the variant\n  varcfg \
	              preview  Print the highlighted header\n  varcfg check    Verify exported files \
	              are up to date\n  varcfg info     Inspect the schema and values"
)]
pub struct VarcfgCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Schema file, overriding `schema` in varcfg.toml.
	#[arg(long, global = true)]
	pub schema: Option<PathBuf>,

	/// Values file applied on top of the schema defaults, overriding `values`
	/// in varcfg.toml.
	#[arg(long, global = true)]
	pub values: Option<PathBuf>,

	/// Variant name used in the header and for export file names.
	#[arg(long, global = true)]
	pub variant: Option<String>,
}

impl VarcfgCli {
	/// Command line overrides for loading the variant context.
	pub fn context_options(&self, out_dir: Option<PathBuf>, formats: &[FormatArg]) -> ContextOptions {
		ContextOptions {
			schema: self.schema.clone(),
			values: self.values.clone(),
			variant: self.variant.clone(),
			out_dir,
			formats: formats.iter().copied().map(ExportFormat::from).collect(),
		}
	}
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize varcfg in a project by creating a sample schema and config.
	///
	/// Creates `schema.json` and `varcfg.toml` in the project root. Existing
	/// files are left untouched.
	Init,
	/// Export the variant as JSON, YAML and a C header.
	///
	/// Loads the schema, applies the values file on top of the schema
	/// defaults, and writes `<variant>.json`, `<variant>.yaml` and
	/// `<variant>_final_cfg.h` into the output directory.
	Export {
		/// Formats to export. Repeat to select several. Defaults to the
		/// formats in varcfg.toml, or all of them.
		#[arg(long = "format", short, value_enum)]
		formats: Vec<FormatArg>,

		/// Directory to write exports into. Defaults to `generated`.
		#[arg(long, short)]
		out: Option<PathBuf>,

		/// Print exports to stdout instead of writing files.
		#[arg(long, default_value_t = false, conflicts_with_all = ["out", "watch"])]
		stdout: bool,

		/// Watch for file changes and export again automatically.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Print the generated C header with HTML syntax highlighting.
	///
	/// The output is escaped so it can be embedded in a web page as-is.
	Preview {
		/// Wrap the highlighted header in a standalone HTML page.
		#[arg(long, default_value_t = false)]
		html: bool,
	},
	/// Check that exported files are up to date.
	///
	/// Renders every export and compares it with the file in the output
	/// directory. Exits with a non-zero status code if any file is missing or
	/// out of date.
	Check {
		/// Show a unified diff for each stale file.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,

		/// Directory holding the exports. Defaults to `generated`.
		#[arg(long, short)]
		out: Option<PathBuf>,
	},
	/// Print a summary of the schema, values and header diagnostics.
	Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
	/// `<variant>.json`
	Json,
	/// `<variant>.yaml`
	Yaml,
	/// `<variant>_final_cfg.h`
	Header,
}

impl From<FormatArg> for ExportFormat {
	fn from(format: FormatArg) -> Self {
		match format {
			FormatArg::Json => ExportFormat::Json,
			FormatArg::Yaml => ExportFormat::Yaml,
			FormatArg::Header => ExportFormat::Header,
		}
	}
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
