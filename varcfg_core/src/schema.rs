use std::collections::HashMap;
use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::VarcfgError;
use crate::VarcfgResult;

/// The value type a schema field declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
	Boolean,
	Number,
	String,
}

impl Display for FieldKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Boolean => write!(f, "boolean"),
			Self::Number => write!(f, "number"),
			Self::String => write!(f, "string"),
		}
	}
}

/// A declared default.
///
/// A default of the field's own type stays typed. Anything else is carried
/// as-is and encoded best-effort, so a `"0x10"` default on a number field
/// still reaches the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue<T> {
	Typed(T),
	Mismatched(Value),
}

impl<T: Clone + Into<Value>> DefaultValue<T> {
	pub fn to_value(&self) -> Value {
		match self {
			Self::Typed(typed) => typed.clone().into(),
			Self::Mismatched(value) => value.clone(),
		}
	}

	pub fn mismatched(&self) -> Option<&Value> {
		match self {
			Self::Typed(_) => None,
			Self::Mismatched(value) => Some(value),
		}
	}
}

/// A field descriptor from the schema.
///
/// ```json
/// { "type": "number", "default": 115200, "description": "UART baud rate" }
/// ```
///
/// Each kind carries a default of its own type. A `null` or missing default
/// means the field has no default; falsy defaults (`0`, `""`, `false`) are
/// still defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldSpec {
	Boolean {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		default: Option<DefaultValue<bool>>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		description: Option<String>,
	},
	Number {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		default: Option<DefaultValue<serde_json::Number>>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		description: Option<String>,
	},
	String {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		default: Option<DefaultValue<String>>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		description: Option<String>,
	},
}

impl FieldSpec {
	pub fn kind(&self) -> FieldKind {
		match self {
			Self::Boolean { .. } => FieldKind::Boolean,
			Self::Number { .. } => FieldKind::Number,
			Self::String { .. } => FieldKind::String,
		}
	}

	/// The declared default as a dynamic value, or `None` when the field has
	/// no default.
	pub fn default_value(&self) -> Option<Value> {
		match self {
			Self::Boolean { default, .. } => default.as_ref().map(DefaultValue::to_value),
			Self::Number { default, .. } => default.as_ref().map(DefaultValue::to_value),
			Self::String { default, .. } => default.as_ref().map(DefaultValue::to_value),
		}
	}

	pub fn has_default(&self) -> bool {
		match self {
			Self::Boolean { default, .. } => default.is_some(),
			Self::Number { default, .. } => default.is_some(),
			Self::String { default, .. } => default.is_some(),
		}
	}

	/// The default when it does not match the declared kind.
	pub fn mismatched_default(&self) -> Option<&Value> {
		match self {
			Self::Boolean { default, .. } => default.as_ref().and_then(DefaultValue::mismatched),
			Self::Number { default, .. } => default.as_ref().and_then(DefaultValue::mismatched),
			Self::String { default, .. } => default.as_ref().and_then(DefaultValue::mismatched),
		}
	}

	pub fn description(&self) -> Option<&str> {
		match self {
			Self::Boolean { description, .. }
			| Self::Number { description, .. }
			| Self::String { description, .. } => description.as_deref(),
		}
	}
}

/// A named field in a [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
	pub key: String,
	pub spec: FieldSpec,
}

/// A problem found while loading a field descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDiagnostic {
	pub key: String,
	pub reason: String,
	/// `true` when the descriptor was left out of the schema. Otherwise the
	/// field was kept and only its default is suspect.
	pub dropped: bool,
}

/// The ordered set of configuration keys a variant can fill in.
///
/// Field order follows the source document and is used for display and for
/// the order of the conditional defaults in the generated header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
	fields: Vec<SchemaField>,
	index: HashMap<String, usize>,
	diagnostics: Vec<SchemaDiagnostic>,
}

impl Schema {
	/// Build a schema from already typed fields. A repeated key replaces the
	/// earlier descriptor but keeps its position.
	pub fn from_fields<K, I>(fields: I) -> Self
	where
		K: Into<String>,
		I: IntoIterator<Item = (K, FieldSpec)>,
	{
		let mut schema = Self::default();
		for (key, spec) in fields {
			schema.insert(key.into(), spec);
		}
		schema
	}

	/// Build a schema from a parsed document. The root must be a mapping.
	///
	/// Descriptors with an unknown `type` are dropped. A default that does not
	/// match its type is kept for best-effort encoding. Both are recorded in
	/// [`Schema::diagnostics`].
	pub fn from_value(value: Value, source: &str) -> VarcfgResult<Self> {
		let entries = match value {
			Value::Object(entries) => entries,
			other => {
				return Err(VarcfgError::SchemaParse {
					path: source.to_string(),
					reason: format!(
						"expected a mapping at the root, found {}",
						value_type_name(&other)
					),
				});
			}
		};

		let mut schema = Self::default();

		for (key, descriptor) in entries {
			match serde_json::from_value::<FieldSpec>(descriptor) {
				Ok(spec) => {
					if let Some(default) = spec.mismatched_default() {
						let reason = format!("default {default} does not match type {}", spec.kind());
						tracing::warn!(key = %key, source, "keeping field with lenient default: {reason}");
						schema.diagnostics.push(SchemaDiagnostic {
							key: key.clone(),
							reason,
							dropped: false,
						});
					}
					schema.insert(key, spec);
				}
				Err(e) => {
					tracing::warn!(key = %key, source, "dropping invalid field descriptor: {e}");
					schema.diagnostics.push(SchemaDiagnostic {
						key,
						reason: e.to_string(),
						dropped: true,
					});
				}
			}
		}

		Ok(schema)
	}

	fn insert(&mut self, key: String, spec: FieldSpec) {
		if let Some(&position) = self.index.get(&key) {
			self.fields[position].spec = spec;
			return;
		}

		self.index.insert(key.clone(), self.fields.len());
		self.fields.push(SchemaField { key, spec });
	}

	pub fn get(&self, key: &str) -> Option<&FieldSpec> {
		self.index.get(key).map(|&position| &self.fields[position].spec)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.index.contains_key(key)
	}

	pub fn fields(&self) -> &[SchemaField] {
		&self.fields
	}

	pub fn iter(&self) -> impl Iterator<Item = &SchemaField> {
		self.fields.iter()
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Descriptors that were dropped or kept with a mismatched default.
	pub fn diagnostics(&self) -> &[SchemaDiagnostic] {
		&self.diagnostics
	}
}

pub(crate) fn value_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "a mapping",
	}
}
