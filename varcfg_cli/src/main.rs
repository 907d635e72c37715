use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;
use varcfg_cli::Commands;
use varcfg_cli::FormatArg;
use varcfg_cli::OutputFormat;
use varcfg_cli::VarcfgCli;
use varcfg_core::CheckResult;
use varcfg_core::DirectorySink;
use varcfg_core::ExportArtifact;
use varcfg_core::VariantContext;
use varcfg_core::check_artifacts;
use varcfg_core::context::load_variant_context;
use varcfg_core::escape_html;
use varcfg_core::export_all;
use varcfg_core::generate_header_with_diagnostics;
use varcfg_core::highlight;
use varcfg_core::variant_name;
use varcfg_core::write_artifacts;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = VarcfgCli::parse();

	// Respect NO_COLOR, --no-color and terminals without color support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Export {
			formats,
			out,
			stdout,
			watch,
		}) => run_export(&args, formats, out.clone(), *stdout, *watch),
		Some(Commands::Preview { html }) => run_preview(&args, *html),
		Some(Commands::Check { diff, format, out }) => run_check(&args, *diff, *format, out.clone()),
		Some(Commands::Info) => run_info(&args),
		None => {
			eprintln!("No subcommand specified. Run `varcfg --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<varcfg_core::VarcfgError>() {
			Ok(varcfg_err) => {
				let report: miette::Report = (*varcfg_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr so exports printed with `--stdout` stay clean.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env("VARCFG_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.try_init()
		.ok();
}

fn resolve_root(args: &VarcfgCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn print_section(title: &str) {
	println!();
	println!("{}", colored!(title, bold));
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("{label:<28} {value}");
}

fn load_context(
	args: &VarcfgCli,
	out: Option<PathBuf>,
	formats: &[FormatArg],
) -> Result<VariantContext, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let options = args.context_options(out, formats);
	Ok(load_variant_context(&root, &options)?)
}

fn render_artifacts(ctx: &VariantContext) -> Result<Vec<ExportArtifact>, Box<dyn std::error::Error>> {
	Ok(export_all(
		&ctx.formats,
		&ctx.schema,
		&ctx.values,
		&ctx.variant,
	)?)
}

fn run_init(args: &VarcfgCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let schema_path = root.join("schema.json");
	let config_path = root.join("varcfg.toml");

	let schema_exists = schema_path.exists();
	let config_exists = config_path.exists();

	if schema_exists {
		println!("Schema file already exists: {}", schema_path.display());
	} else {
		let sample_schema = r#"{
	"UART_BAUD": { "type": "number", "default": 115200, "description": "UART baud rate" },
	"DEVICE_NAME": { "type": "string", "default": "device" },
	"ENABLE_LOG": { "type": "boolean", "default": false, "description": "Enable verbose logging" }
}
"#;

		std::fs::write(&schema_path, sample_schema)?;
		println!("Created schema file: {}", schema_path.display());
	}

	if config_exists {
		// Leave an existing config alone.
	} else {
		let sample_config = "# varcfg configuration\n\nschema = \"schema.json\"\n\n# Values \
		                     applied on top of the schema defaults.\n# values = \
		                     \"values.yaml\"\n\n# Used in the header and for export file \
		                     names.\n# variant = \"board_a\"\n\n[export]\n# out_dir = \
		                     \"generated\"\n# formats = [\"json\", \"yaml\", \"header\"]\n";

		std::fs::write(&config_path, sample_config)?;
		println!("Created varcfg.toml");
	}

	if !schema_exists {
		println!();
		println!("Next steps:");
		println!(
			"  1. Edit {} to describe your configuration keys",
			schema_path.display()
		);
		println!("  2. Add a values file and point `values` in varcfg.toml at it");
		println!("  3. Run `varcfg export` to generate the variant files");
	}

	Ok(())
}

fn run_export(
	args: &VarcfgCli,
	formats: &[FormatArg],
	out: Option<PathBuf>,
	stdout: bool,
	watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let out_dir = run_export_once(args, formats, out.clone(), stdout)?;

	if !watch {
		return Ok(());
	}

	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let root = resolve_root(args);
	let root = root.canonicalize().unwrap_or(root);
	let out_dir = out_dir.canonicalize().unwrap_or(out_dir);
	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				// Writing the exports must not trigger another export.
				let outside_out_dir = event.paths.iter().any(|path| !path.starts_with(&out_dir));
				if outside_out_dir
					&& matches!(
						event.kind,
						notify::EventKind::Modify(_) | notify::EventKind::Create(_)
					) {
					tracing::debug!(paths = ?event.paths, "file change detected");
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&root, notify::RecursiveMode::Recursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, exporting...");
		if let Err(e) = run_export_once(args, formats, out.clone(), false) {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

/// Export once and return the output directory that was used.
fn run_export_once(
	args: &VarcfgCli,
	formats: &[FormatArg],
	out: Option<PathBuf>,
	stdout: bool,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
	let ctx = load_context(args, out, formats)?;
	let artifacts = render_artifacts(&ctx)?;

	if stdout {
		let separate = artifacts.len() > 1;
		for (index, artifact) in artifacts.iter().enumerate() {
			if separate {
				if index > 0 {
					println!();
				}
				println!("==> {} <==", artifact.file_name);
			}
			print!("{}", artifact.contents);
			if !artifact.contents.ends_with('\n') {
				println!();
			}
		}
		return Ok(ctx.out_dir);
	}

	let mut sink = DirectorySink::new(&ctx.out_dir);
	let written = write_artifacts(&artifacts, &mut sink)?;

	println!(
		"Exported {} file(s) to {}.",
		written.len(),
		make_relative(&ctx.out_dir, &ctx.root)
	);

	if args.verbose {
		for path in &written {
			println!("  {}", make_relative(Path::new(path), &ctx.root));
		}
	}

	Ok(ctx.out_dir)
}

fn run_preview(args: &VarcfgCli, html: bool) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = load_context(args, None, &[])?;
	let header = generate_header_with_diagnostics(&ctx.schema, &ctx.values, &ctx.variant);
	let highlighted = highlight(&header.text);

	if html {
		print!("{}", preview_page(&ctx.variant, &highlighted));
	} else {
		print!("{highlighted}");
	}

	Ok(())
}

/// A standalone page around an already highlighted header.
fn preview_page(variant: &str, highlighted: &str) -> String {
	let title = escape_html(variant_name(variant));

	format!(
		"<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title} \
		 header preview</title>\n<style>\npre {{ background: #1e1e1e; color: #d4d4d4; padding: \
		 1em; }}\n.hl-comment {{ color: #6a9955; }}\n.hl-keyword {{ color: #c586c0; }}\n.hl-string \
		 {{ color: #ce9178; }}\n.hl-number {{ color: #b5cea8; }}\n</style>\n</head>\n<body>\n<pre><code>{highlighted}</code></pre>\n</body>\n</html>\n"
	)
}

fn run_check(
	args: &VarcfgCli,
	show_diff: bool,
	format: OutputFormat,
	out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = load_context(args, out, &[])?;
	let artifacts = render_artifacts(&ctx)?;
	let sink = DirectorySink::new(&ctx.out_dir);
	let result = check_artifacts(&artifacts, &sink)?;
	let root = &ctx.root;

	if result.is_ok() {
		match format {
			OutputFormat::Json => {
				let fresh: Vec<String> = result
					.fresh
					.iter()
					.map(|path| make_relative(path, root))
					.collect();
				let output = serde_json::json!({
					"ok": true,
					"stale": [],
					"missing": [],
					"fresh": fresh,
				});
				println!("{output}");
			}
			OutputFormat::Text => {
				println!(
					"Check passed: all {} export(s) are up to date.",
					result.fresh.len()
				);
			}
		}
		return Ok(());
	}

	match format {
		OutputFormat::Json => {
			let stale_entries: Vec<serde_json::Value> = result
				.stale
				.iter()
				.map(|entry| {
					serde_json::json!({
						"file": make_relative(&entry.path, root),
						"format": entry.format.to_string(),
					})
				})
				.collect();
			let missing_entries: Vec<String> = result
				.missing
				.iter()
				.map(|path| make_relative(path, root))
				.collect();
			let fresh_entries: Vec<String> = result
				.fresh
				.iter()
				.map(|path| make_relative(path, root))
				.collect();
			let output = serde_json::json!({
				"ok": false,
				"stale": stale_entries,
				"missing": missing_entries,
				"fresh": fresh_entries,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			eprintln!("Check failed.");
			eprintln!("  missing exports: {}", result.missing.len());
			eprintln!("  stale exports: {}", result.stale.len());

			if !result.missing.is_empty() {
				eprintln!();
				eprintln!("Missing exports:");
				for path in &result.missing {
					eprintln!("  {}", make_relative(path, root));
				}
			}

			if !result.stale.is_empty() {
				eprintln!();
				eprintln!("Stale exports:");
				for entry in &result.stale {
					eprintln!("  {} ({})", make_relative(&entry.path, root), entry.format);

					if show_diff {
						print_diff(&entry.current_content, &entry.expected_content);
					}
				}
			}

			eprintln!();
			eprintln!("{}", check_summary(&result));
		}
	}

	process::exit(1);
}

fn check_summary(result: &CheckResult) -> String {
	let mut parts = Vec::new();
	if !result.missing.is_empty() {
		parts.push(format!("{} export(s) are missing", result.missing.len()));
	}
	if !result.stale.is_empty() {
		parts.push(format!("{} export(s) are out of date", result.stale.len()));
	}
	format!("{}. Run `varcfg export` to fix.", parts.join(" and "))
}

fn run_info(args: &VarcfgCli) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = load_context(args, None, &[])?;
	let root = &ctx.root;
	let header = generate_header_with_diagnostics(&ctx.schema, &ctx.values, &ctx.variant);

	let resolved_config = ctx
		.config_path
		.as_ref()
		.map_or_else(|| "none".to_string(), |path| make_relative(path, root));
	let values_file = ctx
		.values_path
		.as_ref()
		.map_or_else(|| "none".to_string(), |path| make_relative(path, root));
	let formats = ctx
		.formats
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(", ");

	let set_count = ctx.values.keys().filter(|key| ctx.values.is_set(key)).count();
	let unknown_keys: Vec<&str> = ctx
		.values
		.keys()
		.filter(|key| !ctx.schema.contains_key(key))
		.map(String::as_str)
		.collect();

	println!("{}", colored!("varcfg info", bold));

	print_section("Project");
	print_field("Project root", root.display());
	print_field("Resolved config", resolved_config);
	print_field("Schema file", make_relative(&ctx.schema_path, root));
	print_field("Values file", values_file);
	print_field("Variant", variant_name(&ctx.variant));
	print_field("Output dir", make_relative(&ctx.out_dir, root));
	print_field("Formats", formats);

	print_section("Schema");
	print_field("Fields", ctx.schema.len());
	for field in ctx.schema.iter() {
		let default = field
			.spec
			.default_value()
			.map_or_else(|| "no default".to_string(), |value| value.to_string());
		println!(
			"{:<28} {} = {default}",
			field.key,
			field.spec.kind()
		);
	}

	print_section("Values");
	print_field("Keys", ctx.values.len());
	print_field("Set", set_count);
	print_field("Unset", ctx.values.len().saturating_sub(set_count));
	if unknown_keys.is_empty() {
		print_field("Unknown keys", "none");
	} else {
		print_field("Unknown keys", unknown_keys.join(", "));
	}

	print_section("Header");
	print_field("Skipped keys", header.skipped.len());
	for skipped in &header.skipped {
		println!(
			"{:<28} {} ({})",
			skipped.key,
			skipped.reason,
			skipped.tier
		);
	}

	let diagnostics = ctx.schema.diagnostics();
	let dropped_count = diagnostics.iter().filter(|diagnostic| diagnostic.dropped).count();

	print_section("Diagnostics");
	print_field("Dropped descriptors", dropped_count);
	print_field("Lenient defaults", diagnostics.len() - dropped_count);
	for diagnostic in diagnostics {
		let what = if diagnostic.dropped {
			"dropped descriptor"
		} else {
			"lenient default for"
		};
		eprintln!(
			"{} {what} `{}`: {}",
			colored!("warning:", yellow),
			diagnostic.key,
			diagnostic.reason
		);
	}

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
