//! Formatted output helpers for CLI commands.

use std::fmt::Write as _;

use smoke_runner::report::SuiteReport;

/// Formats milliseconds as a short human-readable duration (e.g. "1m 05s").
#[must_use]
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}.{}s", secs, (ms % 1000) / 100)
    } else {
        format!("{ms}ms")
    }
}

/// Renders one line per case followed by failure details and a total.
#[must_use]
pub fn render_summary(report: &SuiteReport) -> String {
    let mut out = String::new();
    for case in &report.cases {
        let _ = writeln!(
            out,
            "{:<6} {:<48} {:>8}  {}",
            case.status.to_string(),
            case.builder.as_str(),
            format_duration(case.duration_ms),
            case.image
        );
    }
    for case in report.cases.iter().filter(|c| !c.passed()) {
        let _ = writeln!(out, "\n--- {} ---", case.builder);
        if let Some(error) = &case.error {
            let _ = writeln!(out, "{error}");
        }
    }
    let _ = write!(
        out,
        "\n{} passed, {} failed",
        report.passed(),
        report.failed()
    );
    out
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use smoke_common::types::{BuilderName, ImageName};
    use smoke_runner::report::CaseOutcome;

    use super::*;

    #[test]
    fn format_duration_millis() {
        assert_eq!(format_duration(420), "420ms");
    }

    #[test]
    fn format_duration_seconds() {
        assert_eq!(format_duration(2_500), "2.5s");
    }

    #[test]
    fn format_duration_minutes() {
        assert_eq!(format_duration(65_000), "1m 05s");
    }

    #[test]
    fn summary_lists_failures() {
        let case = |name: &str, error: Option<&str>| {
            CaseOutcome::new(
                BuilderName::new(name).unwrap(),
                ImageName::new("smoke-1"),
                Utc::now(),
                Duration::from_secs(3),
                error.map(str::to_owned),
            )
        };
        let report = SuiteReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            cases: vec![case("base", None), case("tiny", Some("health check timed out"))],
        };
        let text = render_summary(&report);
        assert!(text.contains("passed base"));
        assert!(text.contains("failed tiny"));
        assert!(text.contains("--- tiny ---\nhealth check timed out"));
        assert!(text.ends_with("1 passed, 1 failed"));
    }
}
