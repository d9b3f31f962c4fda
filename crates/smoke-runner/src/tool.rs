//! External tool invocation.

use std::path::PathBuf;
use std::process::Command;

use smoke_common::error::{Result, SmokeError};

/// Captured result of one external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Program that was executed.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
    /// Exit code, `-1` when terminated by a signal.
    pub exit_code: i32,
}

impl ToolOutput {
    /// Returns whether the tool exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns stdout followed by stderr.
    #[must_use]
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        format!("{}{}", self.stdout, self.stderr)
    }

    /// Converts the output into the error describing its failure.
    #[must_use]
    pub fn into_error(self) -> SmokeError {
        SmokeError::Tool {
            program: self.program,
            args: self.args.join(" "),
            code: self.exit_code,
            stderr: self.stderr.trim().to_owned(),
        }
    }

    /// Passes successful output through and turns a failure into an error.
    ///
    /// # Errors
    ///
    /// Returns `SmokeError::Tool` if the exit code is non-zero.
    pub fn into_result(self) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(self.into_error())
        }
    }
}

/// Runs `program` with `args` and captures its output.
///
/// A non-zero exit is not an error here; callers decide through
/// [`ToolOutput::into_result`] or their own classification.
///
/// # Errors
///
/// Returns `SmokeError::Io` if the program cannot be spawned.
pub fn run_tool(program: &str, args: &[String]) -> Result<ToolOutput> {
    tracing::debug!(program, args = ?args, "running tool");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| SmokeError::Io {
            path: program.into(),
            source: e,
        })?;

    let result = ToolOutput {
        program: program.to_owned(),
        args: args.to_vec(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code().unwrap_or(-1),
    };
    tracing::debug!(program, exit_code = result.exit_code, "tool finished");
    Ok(result)
}

/// Resolves a tool on `PATH`.
///
/// # Errors
///
/// Returns `SmokeError::NotFound` if the tool is not installed.
pub fn locate_tool(program: &str) -> Result<PathBuf> {
    which::which(program).map_err(|_| SmokeError::NotFound {
        kind: "tool",
        id: program.to_owned(),
    })
}
