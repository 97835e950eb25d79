//! Loaders for the structured data files read by the page renderers.
//!
//! Every call reads the file from disk again; nothing is cached between
//! pages. A missing or malformed file is reported as
//! [`HookError::DataFile`](crate::HookError::DataFile).

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::HookError;
use crate::HookResult;

pub const ORGS_FILE: &str = "orgs.toml";
pub const USING_FILE: &str = "using.toml";
pub const SCHEMA_MAPPINGS_FILE: &str = "schema_mappings.toml";
pub const CONVERSION_TABLE_FILE: &str = "conversion_table.toml";
pub const DEVTOOLS_OUTPUT_FILE: &str = "devtools_output.html";

/// An organisation shown on the index and why pages.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Organisation {
	pub key: String,
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
}

/// A library that depends on the documented project.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Library {
	pub repo: String,
	pub stars: u64,
}

/// One row of the Python type to JSON Schema mapping table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SchemaMapping {
	#[serde(default)]
	pub py_type: String,
	#[serde(default)]
	pub json_type: String,
	/// Extra JSON Schema keywords. Either a string or any TOML value, which is
	/// rendered as JSON.
	#[serde(default)]
	pub additional: Option<toml::Value>,
	#[serde(default)]
	pub defined_in: String,
	#[serde(default)]
	pub notes: String,
}

/// One row of the type conversion table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ConversionRow {
	pub field_type: String,
	pub input_type: String,
	#[serde(default)]
	pub strict: bool,
	#[serde(default)]
	pub python_input: bool,
	#[serde(default)]
	pub json_input: bool,
	#[serde(default)]
	pub condition: Option<String>,
}

/// The type conversion table in source order.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ConversionTable {
	#[serde(default)]
	pub rows: Vec<ConversionRow>,
}

impl ConversionTable {
	/// The rows matching `predicate`, in order.
	#[must_use]
	pub fn filtered(&self, predicate: impl Fn(&ConversionRow) -> bool) -> ConversionTable {
		ConversionTable {
			rows: self
				.rows
				.iter()
				.filter(|row| predicate(row))
				.cloned()
				.collect(),
		}
	}
}

#[derive(Deserialize)]
struct OrgsFile {
	orgs: Vec<Organisation>,
}

#[derive(Deserialize)]
struct UsingFile {
	libs: Vec<Library>,
}

/// Directory holding the renderer data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
	root: PathBuf,
}

impl DataDir {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn path(&self, file_name: &str) -> PathBuf {
		self.root.join(file_name)
	}

	/// Organisations from `orgs.toml` (`[[orgs]]` entries).
	pub fn organisations(&self) -> HookResult<Vec<Organisation>> {
		let file: OrgsFile = load_toml(&self.path(ORGS_FILE))?;
		Ok(file.orgs)
	}

	/// Libraries from `using.toml` (`[[libs]]` entries).
	pub fn libraries(&self) -> HookResult<Vec<Library>> {
		let file: UsingFile = load_toml(&self.path(USING_FILE))?;
		Ok(file.libs)
	}

	/// Rows of `schema_mappings.toml` keyed by their table name, in file
	/// order.
	pub fn schema_mappings(&self) -> HookResult<Vec<(String, SchemaMapping)>> {
		let path = self.path(SCHEMA_MAPPINGS_FILE);
		let table: toml::Table = load_toml(&path)?;

		table
			.into_iter()
			.map(|(name, value)| {
				let mapping = value
					.try_into::<SchemaMapping>()
					.map_err(|e| data_error(&path, format!("table `{name}`: {e}")))?;
				Ok((name, mapping))
			})
			.collect()
	}

	/// Rows of `conversion_table.toml` (`[[rows]]` entries).
	pub fn conversion_table(&self) -> HookResult<ConversionTable> {
		load_toml(&self.path(CONVERSION_TABLE_FILE))
	}

	/// Contents of `file_name` in the data directory.
	pub fn read_text(&self, file_name: &str) -> HookResult<String> {
		read_data_file(&self.path(file_name))
	}
}

/// Read a UTF-8 file, reporting failures as data file errors.
pub fn read_data_file(path: &Path) -> HookResult<String> {
	std::fs::read_to_string(path).map_err(|e| data_error(path, e.to_string()))
}

fn load_toml<T: DeserializeOwned>(path: &Path) -> HookResult<T> {
	let content = read_data_file(path)?;
	toml::from_str(&content).map_err(|e| data_error(path, e.to_string()))
}

fn data_error(path: &Path, reason: String) -> HookError {
	HookError::DataFile {
		path: path.to_path_buf(),
		reason,
	}
}

/// Convert a `toml::Value` to a `serde_json::Value`. Datetimes become
/// strings.
pub(crate) fn toml_to_json(value: &toml::Value) -> serde_json::Value {
	match value {
		toml::Value::String(s) => serde_json::Value::String(s.clone()),
		toml::Value::Integer(i) => serde_json::Value::Number((*i).into()),
		toml::Value::Float(f) => {
			serde_json::Number::from_f64(*f)
				.map_or(serde_json::Value::Null, serde_json::Value::Number)
		}
		toml::Value::Boolean(b) => serde_json::Value::Bool(*b),
		toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
		toml::Value::Array(arr) => serde_json::Value::Array(arr.iter().map(toml_to_json).collect()),
		toml::Value::Table(table) => {
			serde_json::Value::Object(
				table
					.iter()
					.map(|(k, v)| (k.clone(), toml_to_json(v)))
					.collect(),
			)
		}
	}
}

/// Whether a value counts as set. Empty strings, arrays and tables, zero and
/// `false` do not.
pub(crate) fn is_set(value: &toml::Value) -> bool {
	match value {
		toml::Value::String(s) => !s.is_empty(),
		toml::Value::Integer(i) => *i != 0,
		toml::Value::Float(f) => *f != 0.0,
		toml::Value::Boolean(b) => *b,
		toml::Value::Datetime(_) => true,
		toml::Value::Array(arr) => !arr.is_empty(),
		toml::Value::Table(table) => !table.is_empty(),
	}
}
