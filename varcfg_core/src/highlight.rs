use logos::Logos;

/// CSS class applied to `//` comments.
pub const COMMENT_CLASS: &str = "hl-comment";
/// CSS class applied to preprocessor directives.
pub const KEYWORD_CLASS: &str = "hl-keyword";
/// CSS class applied to string literals.
pub const STRING_CLASS: &str = "hl-string";
/// CSS class applied to bare numbers.
pub const NUMBER_CLASS: &str = "hl-number";

/// Raw tokens for the small preprocessor subset a generated header uses.
///
/// Every byte of the input is covered by some token so the walker never has
/// to guess where an error span ends.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
	#[regex(r"//[^\n]*", allow_greedy = true)]
	Comment,
	#[token("#pragma")]
	#[token("#define")]
	#[token("#ifndef")]
	#[token("#endif")]
	Directive,
	#[regex(r#""([^"\\\n]|\\[^\n])*""#)]
	String,
	#[regex(r"[0-9]+")]
	Number,
	#[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
	Word,
	#[token("\n")]
	Newline,
	#[token("/")]
	#[token("#")]
	#[token("\"")]
	Punct,
	#[regex(r#"[^A-Za-z0-9_\n"/#]+"#)]
	Other,
}

/// Escape text for insertion into HTML content or attribute values.
///
/// `&` becomes `&amp;` and is never applied to the output of another
/// replacement, so existing entities in the input are escaped exactly once.
pub fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());

	for ch in text.chars() {
		match ch {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(ch),
		}
	}

	escaped
}

/// Turn raw header text into HTML-safe markup for display.
///
/// The text is tokenized first and every token is escaped before it is
/// wrapped, so nothing from the input reaches the output unescaped. The
/// result is for display only and is never parsed back.
pub fn highlight(raw: &str) -> String {
	let mut output = String::with_capacity(raw.len() * 2);
	let bytes = raw.as_bytes();
	let mut at_line_start = true;

	for (token, span) in RawToken::lexer(raw).spanned() {
		let slice = &raw[span.clone()];

		let class = match token {
			Ok(RawToken::Comment) => Some(COMMENT_CLASS),
			Ok(RawToken::Directive) => {
				(at_line_start && !is_word_byte(bytes.get(span.end))).then_some(KEYWORD_CLASS)
			}
			Ok(RawToken::String) => Some(STRING_CLASS),
			Ok(RawToken::Number) => {
				let before = span.start.checked_sub(1).and_then(|index| bytes.get(index));
				let after = bytes.get(span.end);
				(!is_word_byte(before) && !is_word_byte(after)).then_some(NUMBER_CLASS)
			}
			Ok(RawToken::Word | RawToken::Newline | RawToken::Punct | RawToken::Other) | Err(()) => {
				None
			}
		};

		match class {
			Some(class) => push_span(&mut output, class, slice),
			None => output.push_str(&escape_html(slice)),
		}

		at_line_start = matches!(token, Ok(RawToken::Newline));
	}

	output
}

fn push_span(output: &mut String, class: &str, text: &str) {
	output.push_str("<span class=\"");
	output.push_str(class);
	output.push_str("\">");
	output.push_str(&escape_html(text));
	output.push_str("</span>");
}

fn is_word_byte(byte: Option<&u8>) -> bool {
	byte.is_some_and(|byte| byte.is_ascii_alphanumeric() || *byte == b'_')
}
