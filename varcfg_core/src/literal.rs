use std::borrow::Cow;

use serde_json::Number;
use serde_json::Value;

use crate::FieldKind;

/// Render a value as a C literal for a field of the given kind.
///
/// - `Boolean` becomes `1` or `0` based on the truthiness of the value, so a
///   non-boolean value is coerced rather than rejected.
/// - `String` becomes a double-quoted literal with `\` and `"` escaped.
/// - `Number` is emitted verbatim. No numeric validation happens here; a
///   non-numeric value ends up in the header as-is.
pub fn encode_literal(kind: FieldKind, value: &Value) -> String {
	match kind {
		FieldKind::Boolean => {
			if is_truthy(value) {
				"1".to_string()
			} else {
				"0".to_string()
			}
		}
		FieldKind::String => format!("\"{}\"", escape_c_string(&text_form(value))),
		FieldKind::Number => {
			if !value.is_number() {
				tracing::debug!(%value, "emitting non-numeric value for a number field verbatim");
			}
			text_form(value).into_owned()
		}
	}
}

/// Escape the contents of a C string literal. Backslashes are escaped before
/// quotes so the backslash inserted in front of a quote is not escaped again.
pub fn escape_c_string(text: &str) -> String {
	text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Truthiness with dynamic-language semantics: `null`, `false`, zero, NaN
/// and the empty string are falsy.
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
		Value::String(text) => !text.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// The textual form of a value: strings as-is, everything else as compact
/// JSON (`true`, `42`, `null`, `[1,2]`). Integral floats print without a
/// fraction, so `1.0` reads `1`.
pub fn text_form(value: &Value) -> Cow<'_, str> {
	match value {
		Value::String(text) => Cow::Borrowed(text.as_str()),
		Value::Number(number) => Cow::Owned(normalize_number(number).to_string()),
		other => Cow::Owned(other.to_string()),
	}
}

/// Largest magnitude below which every integral `f64` is exact.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Rewrite a float with no fractional part as an integer, the way a
/// JavaScript number prints. `1.0` becomes `1`, `-0.0` becomes `0`, `1.5`
/// is unchanged.
#[allow(clippy::float_cmp)]
pub fn normalize_number(number: &Number) -> Number {
	match number.as_f64() {
		Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < MAX_SAFE_INTEGER => {
			Number::from(float as i64)
		}
		_ => number.clone(),
	}
}

/// Apply [`normalize_number`] to every number in `value`.
pub fn normalize_value(value: Value) -> Value {
	match value {
		Value::Number(number) => Value::Number(normalize_number(&number)),
		Value::Array(items) => Value::Array(items.into_iter().map(normalize_value).collect()),
		Value::Object(entries) => {
			Value::Object(
				entries
					.into_iter()
					.map(|(key, value)| (key, normalize_value(value)))
					.collect(),
			)
		}
		other => other,
	}
}
