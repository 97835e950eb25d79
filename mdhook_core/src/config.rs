use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::HookError;
use crate::HookResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["mdhook.toml", ".mdhook.toml", ".config/mdhook.toml"];

/// Lowest Python minor version a code sample is rendered for.
pub const DEFAULT_MIN_MINOR: u32 = 9;

/// Highest Python minor version a code sample is rendered for.
pub const DEFAULT_MAX_MINOR: u32 = 13;

/// Configuration loaded from an `mdhook.toml` file.
///
/// ```toml
/// site_url = "https://docs.example.com"
/// docs_dir = "docs"
///
/// [data]
/// dir = "docs/plugins"
///
/// [include]
/// settings = "pydantic-settings/index.md"
///
/// [upgrade]
/// min_minor = 9
/// max_minor = 13
/// command = "python3 scripts/upgrade.py --min-version 3.{minor}"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
	/// Canonical URL of the built site. The pre-build hook rejects the build
	/// when this is missing.
	#[serde(default)]
	pub site_url: Option<String>,
	/// Directory holding the markdown pages, relative to the project root.
	#[serde(default = "default_docs_dir")]
	pub docs_dir: PathBuf,
	#[serde(default)]
	pub data: DataConfig,
	#[serde(default)]
	pub include: IncludeConfig,
	#[serde(default)]
	pub upgrade: UpgradeConfig,
}

impl Default for SiteConfig {
	fn default() -> Self {
		Self {
			site_url: None,
			docs_dir: default_docs_dir(),
			data: DataConfig::default(),
			include: IncludeConfig::default(),
			upgrade: UpgradeConfig::default(),
		}
	}
}

/// Location of the structured data files read by the page renderers.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
	/// Directory containing `orgs.toml`, `using.toml`, `schema_mappings.toml`,
	/// `conversion_table.toml` and `devtools_output.html`. Relative to the
	/// project root.
	#[serde(default = "default_data_dir")]
	pub dir: PathBuf,
}

impl Default for DataConfig {
	fn default() -> Self {
		Self {
			dir: default_data_dir(),
		}
	}
}

/// Files included verbatim into pages.
#[derive(Debug, Clone, Deserialize)]
pub struct IncludeConfig {
	/// Settings documentation fragment, relative to the project root.
	#[serde(default = "default_settings_include")]
	pub settings: PathBuf,
}

impl Default for IncludeConfig {
	fn default() -> Self {
		Self {
			settings: default_settings_include(),
		}
	}
}

/// Controls the per-version fan-out of Python code samples.
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeConfig {
	#[serde(default = "default_min_minor")]
	pub min_minor: u32,
	#[serde(default = "default_max_minor")]
	pub max_minor: u32,
	/// Shell command that upgrades a code sample. The code is written to its
	/// stdin and the upgraded code is read from its stdout. `{minor}` is
	/// replaced with the target minor version. When absent, code samples are
	/// never rewritten and every block collapses to a single variant.
	#[serde(default)]
	pub command: Option<String>,
}

impl Default for UpgradeConfig {
	fn default() -> Self {
		Self {
			min_minor: DEFAULT_MIN_MINOR,
			max_minor: DEFAULT_MAX_MINOR,
			command: None,
		}
	}
}

impl UpgradeConfig {
	/// The configured version range.
	pub fn range(&self) -> HookResult<VersionRange> {
		VersionRange::new(self.min_minor, self.max_minor)
	}
}

/// Inclusive range of Python 3 minor versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
	min_minor: u32,
	max_minor: u32,
}

impl VersionRange {
	pub fn new(min_minor: u32, max_minor: u32) -> HookResult<Self> {
		if min_minor > max_minor {
			return Err(HookError::InvalidVersionRange {
				min: min_minor,
				max: max_minor,
			});
		}

		Ok(Self {
			min_minor,
			max_minor,
		})
	}

	pub fn min_minor(&self) -> u32 {
		self.min_minor
	}

	pub fn max_minor(&self) -> u32 {
		self.max_minor
	}
}

impl Default for VersionRange {
	fn default() -> Self {
		Self {
			min_minor: DEFAULT_MIN_MINOR,
			max_minor: DEFAULT_MAX_MINOR,
		}
	}
}

fn default_docs_dir() -> PathBuf {
	PathBuf::from("docs")
}

fn default_data_dir() -> PathBuf {
	PathBuf::from("docs/plugins")
}

fn default_settings_include() -> PathBuf {
	PathBuf::from("pydantic-settings/index.md")
}

fn default_min_minor() -> u32 {
	DEFAULT_MIN_MINOR
}

fn default_max_minor() -> u32 {
	DEFAULT_MAX_MINOR
}

impl SiteConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> HookResult<Option<SiteConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;

		Ok(Some(config))
	}

	/// Load the config at `root`, falling back to defaults when no config file
	/// exists.
	pub fn load_or_default(root: &Path) -> HookResult<SiteConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// Parse the config from TOML text and validate the version range.
	pub fn from_toml(content: &str) -> HookResult<SiteConfig> {
		let config: SiteConfig =
			toml::from_str(content).map_err(|e| HookError::ConfigParse(e.to_string()))?;
		config.upgrade.range()?;

		Ok(config)
	}

	/// The site URL, treating an empty or whitespace-only value as absent.
	pub fn site_url(&self) -> Option<&str> {
		self.site_url
			.as_deref()
			.map(str::trim)
			.filter(|url| !url.is_empty())
	}
}
