//! Ordered substring checks against build output.

use std::fmt::Write as _;

use smoke_common::error::{Result, SmokeError};

/// Checks that each expected string appears in `log` after the previous one.
///
/// Matches need not be contiguous. On failure the error carries a diff:
/// `+` for matched lines, `-` for missing ones, followed by the actual log.
///
/// # Errors
///
/// Returns `SmokeError::LogMismatch` if any expected string is missing or
/// out of order.
pub fn assert_in_order<S: AsRef<str>>(log: &str, expected: &[S]) -> Result<()> {
    let mut cursor = 0;
    let mut marks = Vec::with_capacity(expected.len());

    for want in expected {
        let want = want.as_ref();
        match log[cursor..].find(want) {
            Some(pos) => {
                cursor += pos + want.len();
                marks.push(Mark::Found);
            }
            None if log.contains(want) => marks.push(Mark::OutOfOrder),
            None => marks.push(Mark::Missing),
        }
    }

    if marks.iter().all(|m| *m == Mark::Found) {
        return Ok(());
    }
    Err(SmokeError::LogMismatch {
        diff: render_diff(log, expected, &marks),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Found,
    OutOfOrder,
    Missing,
}

fn render_diff<S: AsRef<str>>(log: &str, expected: &[S], marks: &[Mark]) -> String {
    let mut out = String::from("expected, in order:\n");
    for (want, mark) in expected.iter().zip(marks) {
        let want = want.as_ref();
        let _ = match mark {
            Mark::Found => writeln!(out, "  + {want}"),
            Mark::OutOfOrder => writeln!(out, "  - {want} (out of order)"),
            Mark::Missing => writeln!(out, "  - {want}"),
        };
    }
    out.push_str("actual:\n");
    for line in log.lines() {
        let _ = writeln!(out, "    {line}");
    }
    out
}
