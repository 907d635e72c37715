use std::fmt::Display;

use crate::Schema;
use crate::ValueMap;
use crate::encode_literal;
use crate::escape_html;
use crate::is_valid_identifier;

/// Name used for the variant when none is given.
pub const DEFAULT_VARIANT_NAME: &str = "variant";

/// The part of the header a key was being emitted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTier {
	/// Unconditional `#define` from the variant's values.
	Override,
	/// `#ifndef`-guarded default from the schema.
	Default,
}

impl Display for HeaderTier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Override => write!(f, "override"),
			Self::Default => write!(f, "default"),
		}
	}
}

/// Why a key was left out of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
	/// The key is not a valid C identifier.
	InvalidIdentifier,
	/// The value mapping has the key but the schema does not describe it.
	UnknownKey,
}

impl Display for SkipReason {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidIdentifier => write!(f, "not a valid C identifier"),
			Self::UnknownKey => write!(f, "not described by the schema"),
		}
	}
}

/// A key the header generator skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedKey {
	pub key: String,
	pub tier: HeaderTier,
	pub reason: SkipReason,
}

/// A generated header together with the keys that were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHeader {
	/// The raw header text, ready to be written to disk.
	pub text: String,
	/// Keys left out of the header. Never fatal.
	pub skipped: Vec<SkippedKey>,
}

/// The variant name to use for comments and file names.
pub fn variant_name(variant: &str) -> &str {
	if variant.is_empty() {
		DEFAULT_VARIANT_NAME
	} else {
		variant
	}
}

/// Generate the C header for a variant. See
/// [`generate_header_with_diagnostics`].
pub fn generate_header(schema: &Schema, values: &ValueMap, variant: &str) -> String {
	generate_header_with_diagnostics(schema, values, variant).text
}

/// Generate the C header for a variant and report the keys that were
/// skipped.
///
/// The header has two tiers. Variant values come first as plain `#define`s,
/// then every schema default follows inside an `#ifndef` guard. A variant
/// value therefore always wins over the default for the same key.
///
/// ```text
/// #pragma once
/// // Auto-generated by varcfg. Do not edit.
/// // Variant: board_a
///
/// #define UART_BAUD 9600
///
/// // UART baud rate
/// #ifndef UART_BAUD
/// #define UART_BAUD 115200
/// #endif
/// ```
///
/// Keys that are not valid C identifiers, and values with no schema
/// descriptor, are skipped with a warning. Unset (`null`) values produce no
/// override.
pub fn generate_header_with_diagnostics(
	schema: &Schema,
	values: &ValueMap,
	variant: &str,
) -> GeneratedHeader {
	let mut lines = vec![
		"#pragma once".to_string(),
		"// Auto-generated by varcfg. Do not edit.".to_string(),
		format!("// Variant: {}", escape_html(variant_name(variant))),
	];
	let mut skipped = Vec::new();

	let mut overrides = Vec::new();
	for (key, value) in values.iter() {
		if !is_valid_identifier(key) {
			skip(&mut skipped, key, HeaderTier::Override, SkipReason::InvalidIdentifier);
			continue;
		}

		let Some(spec) = schema.get(key) else {
			skip(&mut skipped, key, HeaderTier::Override, SkipReason::UnknownKey);
			continue;
		};

		if value.is_null() {
			continue;
		}

		overrides.push(format!("#define {key} {}", encode_literal(spec.kind(), value)));
	}

	let mut defaults = Vec::new();
	for field in schema.iter() {
		let Some(default) = field.spec.default_value() else {
			continue;
		};

		if !is_valid_identifier(&field.key) {
			skip(
				&mut skipped,
				&field.key,
				HeaderTier::Default,
				SkipReason::InvalidIdentifier,
			);
			continue;
		}

		if let Some(comment) = field.spec.description().map(comment_text) {
			if !comment.is_empty() {
				defaults.push(format!("// {comment}"));
			}
		}

		defaults.push(format!("#ifndef {}", field.key));
		defaults.push(format!(
			"#define {} {}",
			field.key,
			encode_literal(field.spec.kind(), &default)
		));
		defaults.push("#endif".to_string());
	}

	for section in [overrides, defaults] {
		if !section.is_empty() {
			lines.push(String::new());
			lines.extend(section);
		}
	}

	let mut text = lines.join("\n");
	text.push('\n');

	GeneratedHeader { text, skipped }
}

fn skip(skipped: &mut Vec<SkippedKey>, key: &str, tier: HeaderTier, reason: SkipReason) {
	tracing::warn!(key, %tier, "skipping key: {reason}");
	skipped.push(SkippedKey {
		key: key.to_string(),
		tier,
		reason,
	});
}

/// Fold a description onto a single `//` comment line. Trailing backslashes
/// are dropped so the comment cannot splice the following line into itself.
fn comment_text(description: &str) -> String {
	let folded = description.split_whitespace().collect::<Vec<_>>().join(" ");
	folded
		.trim_end_matches(|ch: char| ch == '\\' || ch.is_whitespace())
		.to_string()
}
