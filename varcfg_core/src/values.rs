use derive_more::Deref;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::Schema;
use crate::VarcfgError;
use crate::VarcfgResult;
use crate::schema::value_type_name;

/// An immutable snapshot of the values a variant assigns to schema keys.
///
/// Entries keep insertion order. Updates never mutate a snapshot in place:
/// [`ValueMap::with_value`] and friends return a new map, so a rendered
/// preview and an export always observe a consistent set of values.
///
/// A `null` entry means the key is unset. Keys that the schema does not
/// describe are kept, exported to JSON / YAML, and skipped by the header
/// generator.
#[derive(Debug, Clone, Default, PartialEq, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap(Map<String, Value>);

impl ValueMap {
	/// An entry for every schema key, holding the declared default or `null`.
	pub fn from_schema(schema: &Schema) -> Self {
		let map = schema
			.iter()
			.map(|field| {
				(
					field.key.clone(),
					field.spec.default_value().unwrap_or(Value::Null),
				)
			})
			.collect();

		Self(map)
	}

	/// Wrap a parsed values document. The root must be a mapping.
	pub fn from_value(value: Value, source: &str) -> VarcfgResult<Self> {
		match value {
			Value::Object(map) => Ok(Self(map)),
			// An empty document is an empty mapping.
			Value::Null => Ok(Self::default()),
			other => {
				Err(VarcfgError::ValuesParse {
					path: source.to_string(),
					reason: format!(
						"expected a mapping at the root, found {}",
						value_type_name(&other)
					),
				})
			}
		}
	}

	/// Return a new snapshot with `key` set to `value`. An existing key keeps
	/// its position.
	#[must_use]
	pub fn with_value(&self, key: impl Into<String>, value: Value) -> Self {
		let mut map = self.0.clone();
		map.insert(key.into(), value);
		Self(map)
	}

	/// Return a new snapshot with `key` unset (`null`).
	#[must_use]
	pub fn unset(&self, key: impl Into<String>) -> Self {
		self.with_value(key, Value::Null)
	}

	/// Return a new snapshot with every entry of `overrides` applied on top
	/// of this one.
	#[must_use]
	pub fn overlay(&self, overrides: &ValueMap) -> Self {
		let mut map = self.0.clone();
		for (key, value) in overrides.iter() {
			map.insert(key.clone(), value.clone());
		}
		Self(map)
	}

	/// Reset to the schema defaults. Called whenever the schema itself
	/// changes.
	#[must_use]
	pub fn reset(schema: &Schema) -> Self {
		Self::from_schema(schema)
	}

	/// Returns `true` when `key` holds a non-null value.
	pub fn is_set(&self, key: &str) -> bool {
		self.0.get(key).is_some_and(|value| !value.is_null())
	}

	pub fn into_inner(self) -> Map<String, Value> {
		self.0
	}
}

impl From<Map<String, Value>> for ValueMap {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

impl FromIterator<(String, Value)> for ValueMap {
	fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}
