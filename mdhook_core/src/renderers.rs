//! Page-specific renderers.
//!
//! Each renderer recognizes one page by its source path and replaces its
//! `{{ token }}` placeholders with content generated from the data files. A
//! renderer whose page matches loads its data first, so a broken data file
//! fails the page even when the placeholder is absent.

use std::path::PathBuf;

use regex::NoExpand;
use regex::Regex;

use crate::HookResult;
use crate::data::ConversionRow;
use crate::data::ConversionTable;
use crate::data::DEVTOOLS_OUTPUT_FILE;
use crate::data::DataDir;
use crate::data::Library;
use crate::data::Organisation;
use crate::data::SchemaMapping;
use crate::data::is_set;
use crate::data::read_data_file;
use crate::data::toml_to_json;
use crate::json_output::to_json_inline;
use crate::scanner::indent_lines;

pub const INDEX_PAGE: &str = "index.md";
pub const WHY_PAGE: &str = "why.md";
pub const SETTINGS_PAGE: &str = "concepts/pydantic_settings.md";
pub const SCHEMA_MAPPINGS_PAGE: &str = "concepts/json_schema.md";
pub const CONVERSION_TABLE_PAGE: &str = "concepts/conversion_table.md";
pub const DEVTOOLS_PAGE: &str = "integrations/devtools.md";

const DEFAULT_ORG_DESCRIPTION: &str = "_(Based on the criteria described above)_";

const SCHEMA_MAPPING_COLUMNS: [&str; 5] = [
	"Python type",
	"JSON Schema Type",
	"Additional JSON Schema",
	"Defined in",
	"Notes",
];

const CONVERSION_TABLE_COLUMNS: [&str; 5] =
	["Field Type", "Input", "Strict", "Input Source", "Conditions"];

/// A page-specific content generator.
pub trait Renderer: Send + Sync {
	/// Short name used in logs.
	fn name(&self) -> &str;

	/// Whether this renderer handles the page with source path `page_id`.
	fn matches(&self, page_id: &str) -> bool;

	/// Substitute this renderer's placeholders in `text`. Returns `None` when
	/// none of them occur.
	fn render(&self, text: &str) -> HookResult<Option<String>>;
}

/// Text being rendered, tracking whether any placeholder was replaced.
#[derive(Debug)]
pub struct Substitution {
	text: String,
	substituted: bool,
}

impl Substitution {
	pub fn new(text: &str) -> Self {
		Self {
			text: text.to_string(),
			substituted: false,
		}
	}

	/// Replace every `{{ token }}` with `replacement`, verbatim.
	#[must_use]
	pub fn replace(mut self, token: &str, replacement: &str) -> Self {
		let pattern = placeholder_pattern(token);
		if pattern.is_match(&self.text) {
			self.text = pattern
				.replace_all(&self.text, NoExpand(replacement))
				.into_owned();
			self.substituted = true;
		}

		self
	}

	/// The rendered text, or `None` when nothing was replaced.
	pub fn finish(self) -> Option<String> {
		self.substituted.then_some(self.text)
	}
}

/// Pattern for `{{ token }}` with optional spaces or tabs inside the braces.
fn placeholder_pattern(token: &str) -> Regex {
	Regex::new(&format!(r"\{{\{{[ \t]*{}[ \t]*\}}\}}", regex::escape(token)))
		.unwrap_or_else(|e| panic!("invalid placeholder `{token}`: {e}"))
}

/// Organisation logo grid for the index page.
#[derive(Debug, Clone)]
pub struct IndexRenderer {
	page: String,
	data: DataDir,
}

impl IndexRenderer {
	pub fn new(data: DataDir) -> Self {
		Self::for_page(INDEX_PAGE, data)
	}

	pub fn for_page(page: impl Into<String>, data: DataDir) -> Self {
		Self {
			page: page.into(),
			data,
		}
	}
}

impl Renderer for IndexRenderer {
	fn name(&self) -> &str {
		"index"
	}

	fn matches(&self, page_id: &str) -> bool {
		page_id == self.page
	}

	fn render(&self, text: &str) -> HookResult<Option<String>> {
		let orgs = self.data.organisations()?;
		Ok(Substitution::new(text)
			.replace("organisations", &organisations_grid(&orgs))
			.finish())
	}
}

/// HTML grid with one logo tile per organisation, in order.
pub fn organisations_grid(orgs: &[Organisation]) -> String {
	let tiles: String = orgs
		.iter()
		.map(|org| {
			format!(
				"\n<div class=\"tile\">\n  <a href=\"why/#org-{key}\" title=\"{name}\">\n    <img \
				 src=\"logos/{key}_logo.png\" alt=\"{name}\" />\n  </a>\n</div>",
				key = org.key,
				name = org.name,
			)
		})
		.collect();

	format!("<div id=\"grid-container\"><div id=\"company-grid\" class=\"grid\">{tiles}</div></div>")
}

/// Library list and organisation descriptions for the why page.
#[derive(Debug, Clone)]
pub struct WhyRenderer {
	page: String,
	data: DataDir,
}

impl WhyRenderer {
	pub fn new(data: DataDir) -> Self {
		Self::for_page(WHY_PAGE, data)
	}

	pub fn for_page(page: impl Into<String>, data: DataDir) -> Self {
		Self {
			page: page.into(),
			data,
		}
	}
}

impl Renderer for WhyRenderer {
	fn name(&self) -> &str {
		"why"
	}

	fn matches(&self, page_id: &str) -> bool {
		page_id == self.page
	}

	fn render(&self, text: &str) -> HookResult<Option<String>> {
		let libraries = self.data.libraries()?;
		let orgs = self.data.organisations()?;

		Ok(Substitution::new(text)
			.replace("libraries", &library_list(&libraries))
			.replace("organisations", &organisation_sections(&orgs))
			.finish())
	}
}

/// Markdown bullet list linking each library with its star count.
pub fn library_list(libraries: &[Library]) -> String {
	libraries
		.iter()
		.map(|lib| {
			format!(
				"* [`{repo}`](https://github.com/{repo}) {stars} stars",
				repo = lib.repo,
				stars = group_thousands(lib.stars)
			)
		})
		.collect::<Vec<_>>()
		.join("\n")
}

/// One heading with an anchor and a description per organisation.
pub fn organisation_sections(orgs: &[Organisation]) -> String {
	orgs.iter()
		.map(|org| {
			let description = org
				.description
				.as_deref()
				.filter(|description| !description.is_empty())
				.unwrap_or(DEFAULT_ORG_DESCRIPTION);
			format!("### {} {{#org-{}}}\n\n{description}", org.name, org.key)
		})
		.collect::<Vec<_>>()
		.join("\n\n")
}

/// `12345` → `12,345`.
pub fn group_thousands(value: u64) -> String {
	let digits = value.to_string();
	let mut result = String::with_capacity(digits.len() + digits.len() / 3);

	for (i, digit) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			result.push(',');
		}
		result.push(digit);
	}

	result
}

/// Includes a markdown file verbatim.
#[derive(Debug, Clone)]
pub struct IncludeRenderer {
	page: String,
	token: String,
	path: PathBuf,
}

impl IncludeRenderer {
	/// The settings documentation fragment at `path`.
	pub fn settings(path: impl Into<PathBuf>) -> Self {
		Self::new(SETTINGS_PAGE, "pydantic_settings", path)
	}

	pub fn new(page: impl Into<String>, token: impl Into<String>, path: impl Into<PathBuf>) -> Self {
		Self {
			page: page.into(),
			token: token.into(),
			path: path.into(),
		}
	}
}

impl Renderer for IncludeRenderer {
	fn name(&self) -> &str {
		"include"
	}

	fn matches(&self, page_id: &str) -> bool {
		page_id == self.page
	}

	fn render(&self, text: &str) -> HookResult<Option<String>> {
		let content = read_data_file(&self.path)?;
		Ok(Substitution::new(text).replace(&self.token, &content).finish())
	}
}

/// Python type to JSON Schema mapping table.
#[derive(Debug, Clone)]
pub struct SchemaMappingsRenderer {
	page: String,
	data: DataDir,
}

impl SchemaMappingsRenderer {
	pub fn new(data: DataDir) -> Self {
		Self::for_page(SCHEMA_MAPPINGS_PAGE, data)
	}

	pub fn for_page(page: impl Into<String>, data: DataDir) -> Self {
		Self {
			page: page.into(),
			data,
		}
	}
}

impl Renderer for SchemaMappingsRenderer {
	fn name(&self) -> &str {
		"schema_mappings"
	}

	fn matches(&self, page_id: &str) -> bool {
		page_id == self.page
	}

	fn render(&self, text: &str) -> HookResult<Option<String>> {
		let mappings = self.data.schema_mappings()?;
		let table = schema_mappings_table(mappings.iter().map(|(_, mapping)| mapping))?;

		Ok(Substitution::new(text)
			.replace("schema_mappings_table", &table)
			.finish())
	}
}

/// Markdown table with one row per mapping. Cell values are not escaped, so a
/// `|` inside a value breaks the row.
pub fn schema_mappings_table<'a>(
	mappings: impl IntoIterator<Item = &'a SchemaMapping>,
) -> HookResult<String> {
	let mut table = table_heading(&SCHEMA_MAPPING_COLUMNS);

	for mapping in mappings {
		let additional = match &mapping.additional {
			Some(value) if is_set(value) => {
				match value {
					toml::Value::String(s) => format!("`{s}`"),
					other => format!("`{}`", to_json_inline(&toml_to_json(other))?),
				}
			}
			_ => String::new(),
		};

		table.push_str(&table_row(&[
			format!("`{}`", mapping.py_type),
			format!("`{}`", mapping.json_type),
			additional,
			mapping.defined_in.clone(),
			mapping.notes.clone(),
		]));
	}

	Ok(table)
}

/// Type conversion tables, one per input filter.
#[derive(Debug, Clone)]
pub struct ConversionTableRenderer {
	page: String,
	data: DataDir,
}

impl ConversionTableRenderer {
	pub fn new(data: DataDir) -> Self {
		Self::for_page(CONVERSION_TABLE_PAGE, data)
	}

	pub fn for_page(page: impl Into<String>, data: DataDir) -> Self {
		Self {
			page: page.into(),
			data,
		}
	}
}

type RowFilter = fn(&ConversionRow) -> bool;

/// Placeholder suffixes and the rows each table shows.
const CONVERSION_TABLE_FILTERS: [(&str, RowFilter); 5] = [
	("all", |_| true),
	("json", |row| row.json_input),
	("json_strict", |row| row.json_input && row.strict),
	("python", |row| row.python_input),
	("python_strict", |row| row.python_input && row.strict),
];

impl Renderer for ConversionTableRenderer {
	fn name(&self) -> &str {
		"conversion_table"
	}

	fn matches(&self, page_id: &str) -> bool {
		page_id == self.page
	}

	fn render(&self, text: &str) -> HookResult<Option<String>> {
		let table = self.data.conversion_table()?;
		let mut substitution = Substitution::new(text);

		for (table_id, filter) in CONVERSION_TABLE_FILTERS {
			let markdown = indent_lines(&conversion_table_markdown(&table.filtered(filter)), "    ");
			substitution = substitution.replace(&format!("conversion_table_{table_id}"), &markdown);
		}

		Ok(substitution.finish())
	}
}

/// Markdown rendering of the conversion table.
pub fn conversion_table_markdown(table: &ConversionTable) -> String {
	let mut markdown = table_heading(&CONVERSION_TABLE_COLUMNS);

	for row in &table.rows {
		let source = match (row.python_input, row.json_input) {
			(true, true) => "Python & JSON",
			(true, false) => "Python",
			(false, true) => "JSON",
			(false, false) => "",
		};

		markdown.push_str(&table_row(&[
			format!("`{}`", row.field_type),
			format!("`{}`", row.input_type),
			String::from(if row.strict { "✓" } else { "" }),
			source.to_string(),
			row.condition.clone().unwrap_or_default(),
		]));
	}

	markdown
}

/// Pre-rendered terminal output of the devtools integration.
#[derive(Debug, Clone)]
pub struct DevtoolsRenderer {
	page: String,
	data: DataDir,
}

impl DevtoolsRenderer {
	pub fn new(data: DataDir) -> Self {
		Self::for_page(DEVTOOLS_PAGE, data)
	}

	pub fn for_page(page: impl Into<String>, data: DataDir) -> Self {
		Self {
			page: page.into(),
			data,
		}
	}
}

impl Renderer for DevtoolsRenderer {
	fn name(&self) -> &str {
		"devtools"
	}

	fn matches(&self, page_id: &str) -> bool {
		page_id == self.page
	}

	fn render(&self, text: &str) -> HookResult<Option<String>> {
		let html = self.data.read_text(DEVTOOLS_OUTPUT_FILE)?;
		let full_html = format!(
			"<div class=\"highlight\">\n<pre><code>{}</code></pre>\n</div>",
			html.trim_matches('\n')
		);

		Ok(Substitution::new(text)
			.replace("devtools_example", &full_html)
			.finish())
	}
}

fn table_row<S: AsRef<str>>(cells: &[S]) -> String {
	let cells: Vec<&str> = cells.iter().map(AsRef::as_ref).collect();
	format!("| {} |\n", cells.join(" | "))
}

fn table_heading(columns: &[&str]) -> String {
	let mut heading = table_row(columns);
	heading.push_str(&table_row(&vec!["-"; columns.len()]));
	heading
}
