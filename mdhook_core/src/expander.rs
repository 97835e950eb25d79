use std::sync::Arc;

use crate::HookResult;
use crate::config::VersionRange;
use crate::modernize::Modernizer;
use crate::scanner::BlockScanner;
use crate::scanner::RegexScanner;
use crate::scanner::SourceBlock;
use crate::scanner::indent_lines;
use crate::scanner::replace_spans;

const TAB_INDENT: &str = "    ";

/// One rendering of a code sample for a minimum Python version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
	pub minor: u32,
	pub body: String,
}

/// Renders every Python code block once per supported minor version and
/// wraps the distinct renderings in content tabs.
pub struct VersionExpander {
	range: VersionRange,
	modernizer: Arc<dyn Modernizer>,
	scanner: Arc<dyn BlockScanner>,
}

impl std::fmt::Debug for VersionExpander {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("VersionExpander")
			.field("range", &self.range)
			.finish_non_exhaustive()
	}
}

impl VersionExpander {
	pub fn new(range: VersionRange, modernizer: impl Modernizer + 'static) -> Self {
		Self {
			range,
			modernizer: Arc::new(modernizer),
			scanner: Arc::new(RegexScanner),
		}
	}

	/// Use `scanner` instead of the default [`RegexScanner`].
	#[must_use]
	pub fn with_scanner(mut self, scanner: Arc<dyn BlockScanner>) -> Self {
		self.scanner = scanner;
		self
	}

	pub fn range(&self) -> VersionRange {
		self.range
	}

	/// The scanner locating python blocks.
	pub fn scanner(&self) -> Arc<dyn BlockScanner> {
		Arc::clone(&self.scanner)
	}

	/// Replace each multi-variant Python block in `text` with one tab per
	/// distinct variant. Blocks marked `upgrade="skip"` and blocks whose
	/// variants are all identical are left untouched.
	pub fn expand(&self, text: &str) -> HookResult<String> {
		let mut replacements = Vec::new();

		for block in self.scanner.python_blocks(text) {
			if let Some(tabs) = self.render_tabs(&block)? {
				replacements.push((block.span.clone(), tabs));
			}
		}

		Ok(replace_spans(text, replacements))
	}

	/// The distinct renderings of `block`, ascending by version. A rendering
	/// identical to the previously kept one is dropped.
	pub fn variants(&self, block: &SourceBlock<'_>) -> HookResult<Vec<Variant>> {
		let min_minor = block
			.required_minor()
			.unwrap_or_else(|| self.range.min_minor());
		let max_minor = self.range.max_minor();

		if min_minor > max_minor {
			return Ok(Vec::new());
		}

		let mut variants = vec![Variant {
			minor: min_minor,
			body: block.body.to_string(),
		}];

		for minor in (min_minor + 1)..=max_minor {
			let body = self.modernizer.modernize(block.body, minor)?;
			if variants.last().is_some_and(|last| last.body == body) {
				continue;
			}

			variants.push(Variant { minor, body });
		}

		Ok(variants)
	}

	fn render_tabs(&self, block: &SourceBlock<'_>) -> HookResult<Option<String>> {
		if block.is_skipped() {
			tracing::debug!(language = block.language(), "code block opted out of upgrades");
			return Ok(None);
		}

		let variants = self.variants(block)?;
		if variants.len() <= 1 {
			return Ok(None);
		}

		tracing::debug!(
			language = block.language(),
			tabs = variants.len(),
			"rendering version tabs"
		);

		let sections: Vec<String> = variants
			.iter()
			.map(|variant| {
				let content = indent_lines(
					&format!("{}\n{}```{}", block.info, variant.body, block.annotations),
					TAB_INDENT,
				);
				format!("=== \"Python 3.{} and above\"\n\n{content}", variant.minor)
			})
			.collect();

		Ok(Some(sections.join("\n\n")))
	}
}
