use std::io::Write;
use std::process::Command;
use std::process::Stdio;

use crate::HookError;
use crate::HookResult;

/// Rewrites a Python code sample to the idioms available from a given minor
/// version onwards, removing imports that become unused.
///
/// Implementations must be deterministic: the expander compares their output
/// across versions to decide which tabs to render.
pub trait Modernizer: Send + Sync {
	fn modernize(&self, code: &str, minor: u32) -> HookResult<String>;
}

impl<F> Modernizer for F
where
	F: Fn(&str, u32) -> HookResult<String> + Send + Sync,
{
	fn modernize(&self, code: &str, minor: u32) -> HookResult<String> {
		self(code, minor)
	}
}

/// Returns code samples unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Modernizer for Identity {
	fn modernize(&self, code: &str, _minor: u32) -> HookResult<String> {
		Ok(code.to_string())
	}
}

/// Runs an external upgrade tool through the shell once per version.
///
/// The code sample is written to the command's stdin and the upgraded code is
/// read from its stdout. Every `{minor}` in the command line is replaced with
/// the target minor version.
#[derive(Debug, Clone)]
pub struct CommandModernizer {
	command: String,
}

impl CommandModernizer {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
		}
	}

	/// The command line for `minor`.
	pub fn command_for(&self, minor: u32) -> String {
		self.command.replace("{minor}", &minor.to_string())
	}
}

impl Modernizer for CommandModernizer {
	fn modernize(&self, code: &str, minor: u32) -> HookResult<String> {
		let command = self.command_for(minor);
		tracing::debug!(%command, minor, "upgrading code sample");

		let error = |reason: String| HookError::Modernize { minor, reason };

		let mut shell = if cfg!(windows) {
			let mut shell = Command::new("cmd");
			shell.arg("/C");
			shell
		} else {
			let mut shell = Command::new("sh");
			shell.arg("-c");
			shell
		};

		let mut child = shell
			.arg(&command)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.spawn()
			.map_err(|e| error(format!("failed to run `{command}`: {e}")))?;

		// stdin is written concurrently with draining stdout.
		let writer = child.stdin.take().map(|mut stdin| {
			let code = code.to_string();
			std::thread::spawn(move || stdin.write_all(code.as_bytes()))
		});

		let output = child
			.wait_with_output()
			.map_err(|e| error(format!("failed to wait for `{command}`: {e}")))?;

		if let Some(writer) = writer {
			let written = writer
				.join()
				.map_err(|_| error(format!("stdin writer for `{command}` panicked")))?;
			// Commands that ignore their input close the pipe early.
			if let Err(e) = written {
				if e.kind() != std::io::ErrorKind::BrokenPipe {
					return Err(error(format!("failed to write to `{command}`: {e}")));
				}
			}
		}

		if !output.status.success() {
			let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
			let reason = if stderr.is_empty() {
				format!(
					"`{command}` exited with status {}",
					output
						.status
						.code()
						.map_or_else(|| "unknown".to_string(), |code| code.to_string())
				)
			} else {
				stderr
			};

			return Err(error(reason));
		}

		String::from_utf8(output.stdout)
			.map_err(|e| error(format!("`{command}` produced invalid UTF-8: {e}")))
	}
}
