//! `mdhook_core` rewrites documentation markdown before it is rendered to
//! HTML. A static site generator calls [`on_pre_build`] once per build and
//! [`Pipeline::on_page_markdown`] once per page.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Page markdown
//!   → Version expander (one content tab per distinct Python version of each code sample)
//!   → JSON output splitter (moves `output="json"` results into their own block)
//!   → Router (first page renderer that substitutes a placeholder wins)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `mdhook.toml`.
//! - [`scanner`]: The [`BlockScanner`] trait and its pattern-based
//!   implementation, which locate the code blocks the pipeline rewrites.
//! - [`modernize`]: The [`Modernizer`] collaborator that upgrades code samples
//!   to newer Python syntax.
//! - [`data`]: Loaders for the TOML and HTML files feeding the renderers.
//! - [`renderers`]: Page renderers substituting `{{ token }}` placeholders.
//!
//! ## Code block directives
//!
//! | Directive          | Effect                                             |
//! | ------------------ | -------------------------------------------------- |
//! | `requires="3.N"`   | First version tab is Python 3.N                     |
//! | `upgrade="skip"`   | Block is never split into version tabs             |
//! | `output="json"`    | Trailing `"""` literal becomes a `json` block      |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdhook_core::{on_pre_build, Page, Pipeline, SiteConfig, SiteFiles};
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let config = SiteConfig::load_or_default(root).unwrap();
//! on_pre_build(&config).unwrap();
//!
//! let pipeline = Pipeline::from_config(&config, root).unwrap();
//! let page = Page::new("index.md");
//! let markdown = std::fs::read_to_string("docs/index.md").unwrap();
//! let rendered = pipeline
//! 	.on_page_markdown(&markdown, &page, &config, &SiteFiles::default())
//! 	.unwrap();
//! println!("{rendered}");
//! ```

pub use config::*;
pub use error::*;
pub use expander::*;
pub use hooks::*;
pub use json_output::*;
pub use modernize::*;
pub use router::*;
pub use scanner::BlockScanner;
pub use scanner::OutputBlock;
pub use scanner::RegexScanner;
pub use scanner::SourceBlock;

pub mod config;
pub mod data;
#[allow(unused_assignments)]
mod error;
mod expander;
mod hooks;
mod json_output;
pub mod modernize;
pub mod renderers;
mod router;
pub mod scanner;

#[cfg(test)]
mod __fixtures;
