//! Locating fenced code blocks in raw markdown.
//!
//! Markdown is treated as opaque text. The [`RegexScanner`] matches fences
//! with line-anchored, non-greedy patterns and makes no attempt to understand
//! nesting: a fence inside an indented block or inside another fence can be
//! paired with the wrong closing fence. Callers only depend on the
//! [`BlockScanner`] trait so a stricter scanner can replace it.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Python code block followed by its optional annotation list.
///
/// The four parts are contiguous: `info`, a newline, `body`, the closing
/// fence and `annotations` together make up `text[span]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlock<'a> {
	/// Byte range of the whole match in the scanned text.
	pub span: Range<usize>,
	/// Opening fence with its info string, e.g. ```` ```py requires="3.10" ````.
	pub info: &'a str,
	/// Code between the opening line and the closing fence. Ends with a
	/// newline.
	pub body: &'a str,
	/// Whitespace after the closing fence followed by any `1. ...` annotation
	/// lines.
	pub annotations: &'a str,
	/// The full matched text.
	pub matched: &'a str,
}

impl SourceBlock<'_> {
	/// The language tag of the block, e.g. `py` or `python`.
	pub fn language(&self) -> &str {
		self.info
			.trim_start_matches('`')
			.trim_start()
			.split(|c: char| c.is_whitespace() || c == '{')
			.next()
			.unwrap_or_default()
	}

	/// Whether the info string opts the block out of version tabs.
	pub fn is_skipped(&self) -> bool {
		self.info.contains(r#"upgrade="skip""#)
	}

	/// The minimum minor version declared with `requires="3.N"`, if any.
	pub fn required_minor(&self) -> Option<u32> {
		REQUIRES_PATTERN
			.captures(self.info)
			.and_then(|caps| caps.get(1))
			.and_then(|minor| minor.as_str().parse().ok())
	}
}

/// Code block flagged with `output="json"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBlock<'a> {
	/// Byte range from the opening fence up to and including the closing
	/// fence.
	pub span: Range<usize>,
	/// Indentation and backticks of the opening fence, e.g. `    ```` `.
	pub fence: &'a str,
	/// Remainder of the opening line including its newline.
	pub info: &'a str,
	/// Text between the opening line and the closing fence.
	pub body: &'a str,
}

/// Finds the code blocks the page hooks rewrite.
///
/// Returned blocks are non-overlapping and ordered by position.
pub trait BlockScanner: std::fmt::Debug + Send + Sync {
	/// Every fenced block whose info string starts with `py`.
	fn python_blocks<'a>(&self, text: &'a str) -> Vec<SourceBlock<'a>>;

	/// Every fenced block whose info string contains `output="json"`.
	fn json_output_blocks<'a>(&self, text: &'a str) -> Vec<OutputBlock<'a>>;
}

static PYTHON_BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?ms)(``` *py.*?)\n(.+?)^```(\s+(?:^\d+\. (?:[^\n][\n]?)+\n?)*)")
		.unwrap_or_else(|e| panic!("invalid python block pattern: {e}"))
});

static JSON_OPENING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?m)^( *```)([^\n]*?output="json"[^\n]*?\n)"#)
		.unwrap_or_else(|e| panic!("invalid json output pattern: {e}"))
});

static REQUIRES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"requires="3\.(\d+)""#)
		.unwrap_or_else(|e| panic!("invalid requires pattern: {e}"))
});

/// Pattern-matching scanner.
///
/// Known limitations:
///
/// - A ```` ```py ```` fence is recognized anywhere on a line, not only at its
///   start.
/// - The closing fence of a python block must start its line, but its
///   indentation is not compared with the opening fence.
/// - An `output="json"` block ends at the next occurrence of its opening
///   fence text, even in the middle of a line.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexScanner;

impl BlockScanner for RegexScanner {
	fn python_blocks<'a>(&self, text: &'a str) -> Vec<SourceBlock<'a>> {
		PYTHON_BLOCK_PATTERN
			.captures_iter(text)
			.filter_map(|caps| {
				let matched = caps.get(0)?;
				Some(SourceBlock {
					span: matched.range(),
					info: caps.get(1)?.as_str(),
					body: caps.get(2)?.as_str(),
					annotations: caps.get(3).map_or("", |m| m.as_str()),
					matched: matched.as_str(),
				})
			})
			.collect()
	}

	fn json_output_blocks<'a>(&self, text: &'a str) -> Vec<OutputBlock<'a>> {
		let mut blocks = Vec::new();
		let mut position = 0;

		while let Some(caps) = JSON_OPENING_PATTERN.captures_at(text, position) {
			let (Some(opening), Some(fence), Some(info)) = (caps.get(0), caps.get(1), caps.get(2))
			else {
				break;
			};

			let body_start = opening.end();
			// The body holds at least one character before the closing fence.
			let closing = text[body_start..].chars().next().and_then(|first| {
				let search_start = body_start + first.len_utf8();
				text[search_start..]
					.find(fence.as_str())
					.map(|offset| search_start + offset)
			});

			match closing {
				Some(body_end) => {
					let end = body_end + fence.len();
					blocks.push(OutputBlock {
						span: opening.start()..end,
						fence: fence.as_str(),
						info: info.as_str(),
						body: &text[body_start..body_end],
					});
					position = end;
				}
				// Unterminated: try the next opening fence.
				None => position = opening.start() + 1,
			}

			if position >= text.len() {
				break;
			}
		}

		blocks
	}
}

/// Replace each byte range of `text` with its replacement. Ranges must be
/// ordered and non-overlapping.
pub(crate) fn replace_spans(
	text: &str,
	replacements: impl IntoIterator<Item = (Range<usize>, String)>,
) -> String {
	let mut result = String::with_capacity(text.len());
	let mut last = 0;

	for (span, replacement) in replacements {
		result.push_str(&text[last..span.start]);
		result.push_str(&replacement);
		last = span.end;
	}

	result.push_str(&text[last..]);
	result
}

/// Prefix every line that contains non-whitespace characters with `prefix`.
/// Whitespace-only lines are left as they are.
pub(crate) fn indent_lines(text: &str, prefix: &str) -> String {
	if prefix.is_empty() {
		return text.to_string();
	}

	let mut result = String::with_capacity(text.len() + prefix.len() * 8);
	for line in text.split_inclusive('\n') {
		if !line.trim().is_empty() {
			result.push_str(prefix);
		}
		result.push_str(line);
	}

	result
}
