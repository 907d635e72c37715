/// Returns `true` when `name` can be used verbatim as a C preprocessor macro
/// name, i.e. the whole string matches `[A-Za-z_][A-Za-z0-9_]*`.
///
/// Only ASCII letters are accepted. Keys that fail this check are skipped by
/// the header generator rather than aborting the export.
pub fn is_valid_identifier(name: &str) -> bool {
	let mut bytes = name.bytes();

	let Some(first) = bytes.next() else {
		return false;
	};

	if !(first.is_ascii_alphabetic() || first == b'_') {
		return false;
	}

	bytes.all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}
