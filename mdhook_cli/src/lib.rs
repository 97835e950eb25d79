use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Run documentation page hooks over a markdown docs directory.",
	long_about = "mdhook rewrites documentation markdown before a static site generator renders \
	              it.\n\nEvery Python code sample is expanded into one content tab per distinct \
	              Python version, `output=\"json\"` results are moved into their own block, and \
	              page placeholders such as `{{ organisations }}` are filled from data \
	              files.\n\nQuick start:\n  mdhook check   Validate the site configuration\n  \
	              mdhook page    Print one transformed page\n  mdhook build   Transform every \
	              page of the docs directory"
)]
pub struct MdhookCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Run the pre-build hook.
	///
	/// Loads `mdhook.toml` and fails when the configuration is invalid or
	/// `site_url` is missing. Ideal as a CI step before the site build.
	Check,
	/// Transform a single page and print the result to stdout.
	Page {
		/// Markdown file to transform.
		file: PathBuf,

		/// Page identifier used to select the page renderer. Defaults to the
		/// file path relative to the docs directory.
		#[arg(long)]
		page_id: Option<String>,
	},
	/// Transform every markdown page of the docs directory.
	///
	/// Runs the pre-build hook, then the page hook on each markdown file, and
	/// writes the results under `--out` preserving relative paths. Files
	/// ignored by `.gitignore` are skipped.
	Build {
		/// Directory receiving the transformed pages, relative to the project
		/// root.
		#[arg(long, default_value = "site-src")]
		out: PathBuf,

		/// Preview which pages would change without writing files. Prints a
		/// diff for each changed page.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
}
