#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

pub const CONFIG: &str = "site_url = \"https://docs.example.com\"\n";

pub const ORGS: &str = "[[orgs]]\nkey = \"acme\"\nname = \"Acme Corp\"\n";

pub fn mdhook_cmd() -> Command {
	let mut cmd = Command::cargo_bin("mdhook").unwrap_or_else(|e| panic!("mdhook binary: {e}"));
	cmd.env("NO_COLOR", "1");
	cmd
}

pub fn write(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}

/// A project with a config file, organisation data, an index page using the
/// organisations placeholder and a plain guide page.
pub fn project() -> std::io::Result<TempDir> {
	let tmp = tempfile::tempdir()?;
	write(tmp.path(), "mdhook.toml", CONFIG)?;
	write(tmp.path(), "docs/plugins/orgs.toml", ORGS)?;
	write(tmp.path(), "docs/index.md", "# Home\n\n{{ organisations }}\n")?;
	write(tmp.path(), "docs/guide.md", "# Guide\n\nNothing to render.\n")?;
	Ok(tmp)
}
