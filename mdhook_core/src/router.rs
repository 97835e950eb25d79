use std::path::Path;

use crate::HookResult;
use crate::config::SiteConfig;
use crate::data::DataDir;
use crate::renderers::ConversionTableRenderer;
use crate::renderers::DevtoolsRenderer;
use crate::renderers::IncludeRenderer;
use crate::renderers::IndexRenderer;
use crate::renderers::Renderer;
use crate::renderers::SchemaMappingsRenderer;
use crate::renderers::WhyRenderer;

/// Dispatches a page to the first renderer that produces output for it.
///
/// Renderers are tried in registration order. A renderer whose page matches
/// but whose placeholders are absent returns `None`, and the next renderer is
/// tried: matching a page and substituting content are independent outcomes.
#[derive(Default)]
pub struct Router {
	renderers: Vec<Box<dyn Renderer>>,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list()
			.entries(self.renderers.iter().map(|renderer| renderer.name()))
			.finish()
	}
}

impl Router {
	pub fn new() -> Self {
		Self::default()
	}

	/// The documentation site's renderers in priority order: index, why,
	/// settings include, schema mappings, conversion table, devtools example.
	pub fn standard(data: &DataDir, settings_include: &Path) -> Self {
		Self::new()
			.with(IndexRenderer::new(data.clone()))
			.with(WhyRenderer::new(data.clone()))
			.with(IncludeRenderer::settings(settings_include))
			.with(SchemaMappingsRenderer::new(data.clone()))
			.with(ConversionTableRenderer::new(data.clone()))
			.with(DevtoolsRenderer::new(data.clone()))
	}

	/// [`Router::standard`] with paths resolved against the project `root`.
	pub fn from_config(config: &SiteConfig, root: &Path) -> Self {
		Self::standard(
			&DataDir::new(root.join(&config.data.dir)),
			&root.join(&config.include.settings),
		)
	}

	/// Append `renderer` with the lowest priority so far.
	#[must_use]
	pub fn with(mut self, renderer: impl Renderer + 'static) -> Self {
		self.renderers.push(Box::new(renderer));
		self
	}

	pub fn len(&self) -> usize {
		self.renderers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.renderers.is_empty()
	}

	/// Render `text` for the page `page_id`. Returns `None` when no renderer
	/// handled the page.
	pub fn route(&self, text: &str, page_id: &str) -> HookResult<Option<String>> {
		for renderer in &self.renderers {
			if !renderer.matches(page_id) {
				continue;
			}

			match renderer.render(text)? {
				Some(rendered) => {
					tracing::debug!(page = page_id, renderer = renderer.name(), "page rendered");
					return Ok(Some(rendered));
				}
				None => {
					tracing::debug!(
						page = page_id,
						renderer = renderer.name(),
						"no placeholder found, trying next renderer"
					);
				}
			}
		}

		Ok(None)
	}
}
