use std::path::PathBuf;

use crate::DirectorySink;
use crate::ExportArtifact;
use crate::ExportFormat;
use crate::VarcfgResult;

/// An exported file whose content no longer matches what would be exported
/// now.
#[derive(Debug)]
pub struct StaleArtifact {
	pub path: PathBuf,
	pub format: ExportFormat,
	/// The content currently on disk.
	pub current_content: String,
	/// The content a fresh export would write.
	pub expected_content: String,
}

/// Result of comparing exported files against a fresh export.
#[derive(Debug, Default)]
pub struct CheckResult {
	/// Files that exist but are out of date.
	pub stale: Vec<StaleArtifact>,
	/// Files that would be written but do not exist yet.
	pub missing: Vec<PathBuf>,
	/// Files that are up to date.
	pub fresh: Vec<PathBuf>,
}

impl CheckResult {
	/// Returns true if every artifact exists and is up to date.
	pub fn is_ok(&self) -> bool {
		self.stale.is_empty() && self.missing.is_empty()
	}
}

/// Compare freshly rendered artifacts against the files in the sink's
/// directory.
pub fn check_artifacts(
	artifacts: &[ExportArtifact],
	sink: &DirectorySink,
) -> VarcfgResult<CheckResult> {
	let mut result = CheckResult::default();

	for artifact in artifacts {
		let path = sink.path_for(&artifact.file_name)?;

		if !path.is_file() {
			result.missing.push(path);
			continue;
		}

		let current_content = std::fs::read_to_string(&path)?;
		if current_content == artifact.contents {
			result.fresh.push(path);
		} else {
			result.stale.push(StaleArtifact {
				path,
				format: artifact.format,
				current_content,
				expected_content: artifact.contents.clone(),
			});
		}
	}

	Ok(result)
}
