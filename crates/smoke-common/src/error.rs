//! Unified error types for the smoke test workspace.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum SmokeError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path (or program) where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// No builder names were supplied.
    #[error("no builders given: pass at least one --name <builder>")]
    NoBuilders,

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// An external tool exited unsuccessfully.
    #[error("`{program} {args}` exited with {code}: {stderr}")]
    Tool {
        /// Program that was executed.
        program: String,
        /// Space-joined arguments.
        args: String,
        /// Exit code, `-1` when terminated by a signal.
        code: i32,
        /// Captured standard error.
        stderr: String,
    },

    /// The image build failed.
    #[error("build of {image} with {builder} failed:\n{log}")]
    Build {
        /// Image name being built.
        image: String,
        /// Builder used for the build.
        builder: String,
        /// Full captured build log.
        log: String,
    },

    /// The build log did not contain the expected lines.
    #[error("build log does not contain the expected buildpacks in order\n{diff}")]
    LogMismatch {
        /// Rendered expected-vs-actual comparison.
        diff: String,
    },

    /// The health endpoint never reported healthy.
    #[error("{url} did not report healthy within {timeout:?}; last response: {last}")]
    HealthTimeout {
        /// Probed URL.
        url: String,
        /// Deadline that elapsed.
        timeout: Duration,
        /// Last observed body or transport error.
        last: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl SmokeError {
    /// Returns whether the error means the resource is already gone.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, SmokeError>;
