use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use crate::HookError;
use crate::HookResult;
use crate::config::SiteConfig;
use crate::expander::VersionExpander;
use crate::json_output::split_json_output_with;
use crate::modernize::CommandModernizer;
use crate::modernize::Identity;
use crate::router::Router;
use crate::scanner::BlockScanner;

/// A documentation page, identified by its source path relative to the docs
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
	src_uri: String,
}

impl Page {
	/// Build a page from its source path. Backslashes are normalized to
	/// forward slashes.
	pub fn new(src_uri: impl AsRef<str>) -> Self {
		Self {
			src_uri: src_uri.as_ref().replace('\\', "/"),
		}
	}

	/// Build a page from a path relative to the docs directory. Returns `None`
	/// when the path is not valid UTF-8.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.to_str().map(Self::new)
	}

	pub fn src_uri(&self) -> &str {
		&self.src_uri
	}
}

/// The files of the site being built, relative to the docs directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteFiles {
	files: Vec<PathBuf>,
}

impl SiteFiles {
	pub fn new(mut files: Vec<PathBuf>) -> Self {
		files.sort();
		files.dedup();
		Self { files }
	}

	pub fn len(&self) -> usize {
		self.files.len()
	}

	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Path> {
		self.files.iter().map(PathBuf::as_path)
	}

	/// The markdown pages among the site files. Paths that are not valid
	/// UTF-8 are skipped.
	pub fn pages(&self) -> impl Iterator<Item = Page> + '_ {
		self.iter()
			.filter(|path| {
				path.extension()
					.is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
			})
			.filter_map(|path| {
				let page = Page::from_path(path);
				if page.is_none() {
					tracing::warn!(path = %path.display(), "skipping page with a non UTF-8 path");
				}
				page
			})
	}
}

/// Reject the build before any page is processed when required settings are
/// missing.
pub fn on_pre_build(config: &SiteConfig) -> HookResult<()> {
	if config.site_url().is_none() {
		return Err(HookError::MissingSiteUrl);
	}

	Ok(())
}

/// The per-page transformation: version tabs, then JSON output blocks, then
/// page-specific placeholders.
///
/// Holds no mutable state, so one pipeline can process pages from several
/// threads.
#[derive(Debug)]
pub struct Pipeline {
	expander: VersionExpander,
	scanner: Arc<dyn BlockScanner>,
	router: Router,
}

impl Pipeline {
	/// Build a pipeline whose JSON output stage uses the same scanner as
	/// `expander`.
	pub fn new(expander: VersionExpander, router: Router) -> Self {
		Self {
			scanner: expander.scanner(),
			expander,
			router,
		}
	}

	/// Build the pipeline described by `config`, resolving data paths against
	/// the project `root`.
	pub fn from_config(config: &SiteConfig, root: &Path) -> HookResult<Self> {
		let range = config.upgrade.range()?;
		let expander = match &config.upgrade.command {
			Some(command) => VersionExpander::new(range, CommandModernizer::new(command)),
			None => VersionExpander::new(range, Identity),
		};

		Ok(Self::new(expander, Router::from_config(config, root)))
	}

	/// Use `scanner` to locate code blocks in every stage.
	#[must_use]
	pub fn with_scanner(self, scanner: Arc<dyn BlockScanner>) -> Self {
		Self {
			expander: self.expander.with_scanner(Arc::clone(&scanner)),
			scanner,
			router: self.router,
		}
	}

	/// Transform the markdown of the page `page_id`.
	pub fn process(&self, markdown: &str, page_id: &str) -> HookResult<String> {
		let markdown = self.expander.expand(markdown)?;
		let markdown = split_json_output_with(self.scanner.as_ref(), &markdown)?;

		match self.router.route(&markdown, page_id)? {
			Some(rendered) => Ok(rendered),
			None => Ok(markdown),
		}
	}

	/// Page hook: called once per page with its raw markdown, returning the
	/// markdown to render.
	pub fn on_page_markdown(
		&self,
		markdown: &str,
		page: &Page,
		_config: &SiteConfig,
		files: &SiteFiles,
	) -> HookResult<String> {
		tracing::debug!(page = page.src_uri(), site_files = files.len(), "processing page");
		self.process(markdown, page.src_uri())
	}
}
