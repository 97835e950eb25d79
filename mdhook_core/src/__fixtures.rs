use std::path::Path;

use tempfile::TempDir;

use crate::HookResult;
use crate::data::CONVERSION_TABLE_FILE;
use crate::data::DEVTOOLS_OUTPUT_FILE;
use crate::data::DataDir;
use crate::data::ORGS_FILE;
use crate::data::SCHEMA_MAPPINGS_FILE;
use crate::data::USING_FILE;

pub const ORGS_TOML: &str = r#"[[orgs]]
key = "acme"
name = "Acme Corp"
description = "Acme validates every rocket order."

[[orgs]]
key = "globex"
name = "Globex"
"#;

pub const USING_TOML: &str = r#"[[libs]]
repo = "acme/rocket"
stars = 12345

[[libs]]
repo = "globex/tiny"
stars = 7
"#;

pub const SCHEMA_MAPPINGS_TOML: &str = r#"[int]
py_type = "int"
json_type = "integer"
defined_in = "JSON Schema Core"

[constr]
py_type = "constr"
json_type = "string"
additional = { maxLength = 10, pattern = "^a" }
defined_in = "JSON Schema Validation"
notes = "Constrained string."

[uuid]
py_type = "UUID"
json_type = "string"
additional = "format: uuid"
"#;

pub const CONVERSION_TABLE_TOML: &str = r#"[[rows]]
field_type = "bool"
input_type = "bool"
strict = true
python_input = true
json_input = true

[[rows]]
field_type = "bool"
input_type = "str"
python_input = true
condition = "Allowed values: 'yes', 'no'."

[[rows]]
field_type = "bytes"
input_type = "str"
strict = true
json_input = true
"#;

pub const DEVTOOLS_HTML: &str = "\n<span class=\"k\">debug</span>(user)\n\n";

/// Temporary data directory holding `files`.
pub fn data_dir_with(files: &[(&str, &str)]) -> (TempDir, DataDir) {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	for (name, content) in files {
		write_file(&tmp.path().join(name), content);
	}
	let data = DataDir::new(tmp.path());
	(tmp, data)
}

/// Temporary data directory holding every renderer data file.
pub fn full_data_dir() -> (TempDir, DataDir) {
	data_dir_with(&[
		(ORGS_FILE, ORGS_TOML),
		(USING_FILE, USING_TOML),
		(SCHEMA_MAPPINGS_FILE, SCHEMA_MAPPINGS_TOML),
		(CONVERSION_TABLE_FILE, CONVERSION_TABLE_TOML),
		(DEVTOOLS_OUTPUT_FILE, DEVTOOLS_HTML),
	])
}

pub fn write_file(path: &Path, content: &str) {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	}
	std::fs::write(path, content).unwrap_or_else(|e| panic!("write: {e}"));
}

/// Rewrites a few typing constructs depending on the target version, like an
/// upgrade tool would.
pub fn typing_modernizer(code: &str, minor: u32) -> HookResult<String> {
	let mut code = code.to_string();
	if minor >= 10 {
		code = code
			.replace("Optional[int]", "int | None")
			.replace("from typing import Optional\n", "");
	}
	if minor >= 12 {
		code = code.replace("class Box(Generic[T]):", "class Box[T]:");
	}
	Ok(code)
}
