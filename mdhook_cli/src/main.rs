use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use ignore::WalkBuilder;
use mdhook_cli::Commands;
use mdhook_cli::MdhookCli;
use mdhook_core::AnyEmptyResult;
use mdhook_core::AnyResult;
use mdhook_core::HookError;
use mdhook_core::Page;
use mdhook_core::Pipeline;
use mdhook_core::SiteConfig;
use mdhook_core::SiteFiles;
use mdhook_core::on_pre_build;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = MdhookCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// --verbose enables DEBUG, otherwise use RUST_LOG.
	let filter = if args.verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::from_default_env()
	};
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_ansi(use_color)
		.with_writer(std::io::stderr)
		.init();

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Check) => run_check(&args),
		Some(Commands::Page { file, page_id }) => run_page(&args, file, page_id.as_deref()),
		Some(Commands::Build { out, dry_run }) => run_build(&args, out, *dry_run),
		None => {
			eprintln!("No subcommand specified. Run `mdhook --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<HookError>() {
			Ok(hook_err) => {
				let report: miette::Report = (*hook_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn resolve_root(args: &MdhookCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(root: &Path) -> AnyResult<SiteConfig> {
	if SiteConfig::resolve_path(root).is_none() {
		tracing::warn!(root = %root.display(), "no mdhook.toml found, using defaults");
	}

	Ok(SiteConfig::load_or_default(root)?)
}

fn run_check(args: &MdhookCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	on_pre_build(&config)?;

	let range = config.upgrade.range()?;
	println!(
		"{} site_url = {}",
		colored!("Configuration is valid:", green),
		config.site_url().unwrap_or_default()
	);
	println!(
		"Code samples are rendered for Python 3.{} to 3.{}.",
		range.min_minor(),
		range.max_minor()
	);

	Ok(())
}

fn run_page(args: &MdhookCli, file: &Path, page_id: Option<&str>) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let pipeline = Pipeline::from_config(&config, &root)?;

	let file = root.join(file);
	let docs_dir = root.join(&config.docs_dir);
	let page = match page_id {
		Some(page_id) => Page::new(page_id),
		None => {
			let relative = file.strip_prefix(&docs_dir).unwrap_or(file.as_path());
			Page::from_path(relative).ok_or_else(|| {
				format!(
					"page path `{}` is not valid UTF-8, pass --page-id",
					relative.display()
				)
			})?
		}
	};

	let markdown = std::fs::read_to_string(&file)?;
	let rendered = pipeline.on_page_markdown(&markdown, &page, &config, &SiteFiles::default())?;
	print!("{rendered}");

	Ok(())
}

fn run_build(args: &MdhookCli, out: &Path, dry_run: bool) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	on_pre_build(&config)?;

	let pipeline = Pipeline::from_config(&config, &root)?;
	let docs_dir = root.join(&config.docs_dir);
	let out_dir = root.join(out);
	let files = site_files(&docs_dir)?;
	let mut changed = 0;

	for page in files.pages() {
		let source = docs_dir.join(page.src_uri());
		let markdown = std::fs::read_to_string(&source)?;
		let rendered = pipeline.on_page_markdown(&markdown, &page, &config, &files)?;

		if rendered != markdown {
			changed += 1;
		}

		if dry_run {
			if rendered != markdown {
				println!("Would update: {}", colored!(page.src_uri(), bold));
				print_diff(&markdown, &rendered);
			}
			continue;
		}

		let target = out_dir.join(page.src_uri());
		if let Some(parent) = target.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&target, rendered)?;
		tracing::info!(page = page.src_uri(), target = %target.display(), "page written");
	}

	let pages = files.pages().count();
	if dry_run {
		println!("Dry run: {changed} of {pages} page(s) would change.");
	} else {
		println!(
			"{} {pages} page(s) to {} ({changed} changed).",
			colored!("Wrote", green),
			out_dir.display()
		);
	}

	Ok(())
}

/// Every file under `docs_dir` that is not ignored, relative to `docs_dir`.
fn site_files(docs_dir: &Path) -> AnyResult<SiteFiles> {
	let mut files = Vec::new();

	for entry in WalkBuilder::new(docs_dir).require_git(false).build() {
		let entry = entry?;
		if !entry.file_type().is_some_and(|file_type| file_type.is_file()) {
			continue;
		}

		let relative = entry.path().strip_prefix(docs_dir)?;
		files.push(relative.to_path_buf());
	}

	Ok(SiteFiles::new(files))
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!("   {change}");
			}
		}
	}
}
