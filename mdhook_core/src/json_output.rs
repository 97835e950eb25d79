use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::HookError;
use crate::HookResult;
use crate::scanner::BlockScanner;
use crate::scanner::RegexScanner;
use crate::scanner::indent_lines;
use crate::scanner::replace_spans;

/// Move the trailing `"""..."""` literal of every `output="json"` code block
/// into its own pretty-printed `json` block below the code.
pub fn split_json_output(text: &str) -> HookResult<String> {
	split_json_output_with(&RegexScanner, text)
}

/// [`split_json_output`] with a custom block scanner.
pub fn split_json_output_with(scanner: &dyn BlockScanner, text: &str) -> HookResult<String> {
	let mut replacements = Vec::new();

	for block in scanner.json_output_blocks(text) {
		let code = replace_trailing_literal(block.body)?;
		replacements.push((
			block.span.clone(),
			format!("{}{}{code}{}\n", block.fence, block.info, block.fence),
		));
	}

	Ok(replace_spans(text, replacements))
}

struct TrailingLiteral<'a> {
	/// Offset of the newline preceding the opening delimiter.
	start: usize,
	indent: &'a str,
	content: &'a str,
	/// Text kept after the closing delimiter.
	tail: &'static str,
}

/// Find a `"""` literal that closes the code, with the opening and closing
/// delimiters at the same indentation. The earliest opening wins.
fn find_trailing_literal(code: &str) -> Option<TrailingLiteral<'_>> {
	for (start, _) in code.match_indices('\n') {
		let rest = &code[start + 1..];
		let indent_len = rest.bytes().take_while(|b| *b == b' ').count();
		if !rest[indent_len..].starts_with(r#"""""#) {
			continue;
		}

		let indent = &rest[..indent_len];
		let content_start = start + 1 + indent_len + 3;

		for tail in ["\n", ""] {
			let closing = format!("{indent}\"\"\"\n{tail}");
			if code.ends_with(&closing) && code.len() - closing.len() >= content_start {
				return Some(TrailingLiteral {
					start,
					indent,
					content: &code[content_start..code.len() - closing.len()],
					tail,
				});
			}
		}
	}

	None
}

fn replace_trailing_literal(code: &str) -> HookResult<String> {
	let Some(literal) = find_trailing_literal(code) else {
		return Ok(code.to_string());
	};

	let value: serde_json::Value =
		serde_json::from_str(literal.content).map_err(|e| HookError::JsonOutput {
			reason: e.to_string(),
		})?;
	let json_text = indent_lines(&to_json_pretty(&value)?, literal.indent);
	let ind = literal.indent;

	Ok(format!(
		"{}\n{ind}```\n\n{ind}JSON output:\n\n{ind}```json\n{json_text}\n{}",
		&code[..literal.start],
		literal.tail
	))
}

/// Serialize with two-space indentation and ASCII-only output.
pub(crate) fn to_json_pretty(value: &impl Serialize) -> HookResult<String> {
	let text = serde_json::to_string_pretty(value).map_err(|e| HookError::JsonOutput {
		reason: e.to_string(),
	})?;

	Ok(escape_non_ascii(&text))
}

/// Serialize on one line with `", "` and `": "` separators and ASCII-only
/// output.
pub(crate) fn to_json_inline(value: &impl Serialize) -> HookResult<String> {
	let mut buf = Vec::new();
	let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
	value
		.serialize(&mut serializer)
		.map_err(|e| HookError::JsonOutput {
			reason: e.to_string(),
		})?;
	let text = String::from_utf8(buf).map_err(|e| HookError::JsonOutput {
		reason: e.to_string(),
	})?;

	Ok(escape_non_ascii(&text))
}

/// Non-ASCII characters only occur inside JSON strings, so escaping the whole
/// serialized text is safe.
fn escape_non_ascii(text: &str) -> String {
	if text.is_ascii() {
		return text.to_string();
	}

	let mut result = String::with_capacity(text.len() + 16);
	let mut units = [0u16; 2];
	for c in text.chars() {
		if c.is_ascii() {
			result.push(c);
			continue;
		}

		for unit in c.encode_utf16(&mut units) {
			result.push_str(&format!("\\u{unit:04x}"));
		}
	}

	result
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
	fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
	where
		W: ?Sized + io::Write,
	{
		if first {
			Ok(())
		} else {
			writer.write_all(b", ")
		}
	}

	fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
	where
		W: ?Sized + io::Write,
	{
		if first {
			Ok(())
		} else {
			writer.write_all(b", ")
		}
	}

	fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
	where
		W: ?Sized + io::Write,
	{
		writer.write_all(b": ")
	}
}
