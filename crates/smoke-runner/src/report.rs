//! Case outcomes and the suite summary.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smoke_common::error::{Result, SmokeError};
use smoke_common::types::{BuilderName, CaseStatus, ImageName};

/// Result of one builder's case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Builder under test.
    pub builder: BuilderName,
    /// Generated image and container name.
    pub image: ImageName,
    /// Whether the case passed.
    pub status: CaseStatus,
    /// Failure description, including build logs or diffs.
    pub error: Option<String>,
    /// When the case started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl CaseOutcome {
    /// Builds an outcome from an optional failure message.
    #[must_use]
    pub fn new(
        builder: BuilderName,
        image: ImageName,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        error: Option<String>,
    ) -> Self {
        let status = if error.is_some() {
            CaseStatus::Failed
        } else {
            CaseStatus::Passed
        };
        Self {
            builder,
            image,
            status,
            error,
            started_at,
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Returns whether the case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Passed
    }
}

/// Outcomes of every case in a run, in the order builders were given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// When the suite started.
    pub started_at: DateTime<Utc>,
    /// When the last case finished.
    pub finished_at: DateTime<Utc>,
    /// One outcome per builder name.
    pub cases: Vec<CaseOutcome>,
}

impl SuiteReport {
    /// Number of passing cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    /// Number of failing cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    /// Returns whether every case passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Writes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| SmokeError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(builder: &str, error: Option<&str>) -> CaseOutcome {
        CaseOutcome::new(
            BuilderName::new(builder).unwrap(),
            ImageName::new("smoke-x"),
            Utc::now(),
            Duration::from_millis(1500),
            error.map(str::to_owned),
        )
    }

    #[test]
    fn status_follows_error() {
        assert!(outcome("a", None).passed());
        assert_eq!(outcome("a", Some("boom")).status, CaseStatus::Failed);
        assert_eq!(outcome("a", None).duration_ms, 1500);
    }

    #[test]
    fn counts_passed_and_failed() {
        let report = SuiteReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            cases: vec![outcome("a", None), outcome("b", Some("boom")), outcome("c", None)],
        };
        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_passed());
    }

    #[test]
    fn write_json_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = SuiteReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            cases: vec![outcome("tiny-builder", Some("health check timed out"))],
        };
        report.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["cases"][0]["builder"], "tiny-builder");
        assert_eq!(value["cases"][0]["status"], "failed");
        assert_eq!(value["cases"][0]["error"], "health check timed out");
    }
}
