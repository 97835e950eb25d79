use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum HookError {
	#[error(transparent)]
	#[diagnostic(code(mdhook::io_error))]
	Io(#[from] std::io::Error),

	#[error("'site_url' must be set")]
	#[diagnostic(
		code(mdhook::missing_site_url),
		help("add `site_url = \"https://...\"` to mdhook.toml")
	)]
	MissingSiteUrl,

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(mdhook::config_parse),
		help("check that mdhook.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("invalid version range: minimum 3.{min} is above maximum 3.{max}")]
	#[diagnostic(
		code(mdhook::invalid_version_range),
		help("set `[upgrade] min_minor` to a value less than or equal to `max_minor`")
	)]
	InvalidVersionRange { min: u32, max: u32 },

	#[error("failed to load data file `{path}`: {reason}")]
	#[diagnostic(
		code(mdhook::data_file),
		help("data files are read from the `[data] dir` configured in mdhook.toml")
	)]
	DataFile { path: PathBuf, reason: String },

	#[error("invalid JSON output literal in code block: {reason}")]
	#[diagnostic(
		code(mdhook::json_output),
		help("the trailing `\"\"\"...\"\"\"` literal of an `output=\"json\"` block must be valid JSON")
	)]
	JsonOutput { reason: String },

	#[error("failed to upgrade code sample for Python 3.{minor}: {reason}")]
	#[diagnostic(code(mdhook::modernize))]
	Modernize { minor: u32, reason: String },
}

pub type HookResult<T> = Result<T, HookError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
