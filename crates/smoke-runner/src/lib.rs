//! Smoke test runner for Maven builds on buildpack builders.
//!
//! Each case stages the sample application, builds it with one builder,
//! checks the build log for the expected buildpacks, runs the image, and
//! waits for its health endpoint before tearing everything down.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod backend;
pub mod cleanup;
pub mod health;
pub mod logs;
pub mod report;
pub mod scenario;
pub mod source;
pub mod suite;
pub mod tool;
