//! Runs one case per builder name.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use smoke_common::config::SmokeConfig;
use smoke_common::error::{Result, SmokeError};
use smoke_common::types::{BuilderName, ImageName};

use crate::backend::docker::DockerRuntime;
use crate::backend::pack::PackBuilder;
use crate::backend::{ContainerRuntime, ImageBuilder};
use crate::report::{CaseOutcome, SuiteReport};
use crate::scenario::Scenario;
use crate::tool;

/// A configured smoke suite.
pub struct Suite {
    config: SmokeConfig,
    builder: Box<dyn ImageBuilder>,
    runtime: Box<dyn ContainerRuntime>,
}

impl Suite {
    /// Creates a suite over explicit backends.
    #[must_use]
    pub fn new(
        config: SmokeConfig,
        builder: Box<dyn ImageBuilder>,
        runtime: Box<dyn ContainerRuntime>,
    ) -> Self {
        Self {
            config,
            builder,
            runtime,
        }
    }

    /// Creates a suite driving the `pack` and `docker` CLIs named in the
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or either tool is
    /// not on `PATH`.
    pub fn with_cli_tools(config: SmokeConfig) -> Result<Self> {
        config.validate()?;
        let pack = tool::locate_tool(&config.pack_binary)?;
        let docker = tool::locate_tool(&config.docker_binary)?;
        tracing::debug!(pack = %pack.display(), docker = %docker.display(), "tools located");

        let builder = PackBuilder::new(pack.to_string_lossy(), docker.to_string_lossy());
        let runtime = DockerRuntime::new(docker.to_string_lossy());
        Ok(Self::new(config, Box::new(builder), Box::new(runtime)))
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &SmokeConfig {
        &self.config
    }

    /// Runs exactly one case per name, duplicates included.
    ///
    /// Cases run concurrently unless the configuration asks for serial
    /// execution; outcomes keep the order of `names`.
    ///
    /// # Errors
    ///
    /// Returns `SmokeError::NoBuilders` if `names` is empty, or an error if
    /// the source directory does not exist.
    pub fn run(&self, names: &[BuilderName]) -> Result<SuiteReport> {
        if names.is_empty() {
            return Err(SmokeError::NoBuilders);
        }
        if !self.config.source_dir.is_dir() {
            return Err(SmokeError::NotFound {
                kind: "source directory",
                id: self.config.source_dir.display().to_string(),
            });
        }

        let started_at = Utc::now();
        let scenario = Scenario::new(&self.config, self.builder.as_ref(), self.runtime.as_ref());
        let cases: Vec<(BuilderName, ImageName)> = names
            .iter()
            .map(|name| (name.clone(), ImageName::generate()))
            .collect();

        tracing::info!(cases = cases.len(), serial = self.config.serial, "suite started");
        let outcomes = if self.config.serial {
            cases
                .iter()
                .map(|(builder, image)| scenario.run(builder, image))
                .collect()
        } else {
            run_parallel(scenario, &cases, self.parallelism(cases.len()))
        };

        let report = SuiteReport {
            started_at,
            finished_at: Utc::now(),
            cases: outcomes,
        };
        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            "suite finished"
        );
        Ok(report)
    }

    fn parallelism(&self, cases: usize) -> usize {
        match self.config.max_parallel {
            0 => cases,
            n => n.min(cases),
        }
    }
}

fn run_parallel(
    scenario: Scenario<'_>,
    cases: &[(BuilderName, ImageName)],
    width: usize,
) -> Vec<CaseOutcome> {
    let next = AtomicUsize::new(0);
    let slots: Mutex<Vec<Option<CaseOutcome>>> = Mutex::new(vec![None; cases.len()]);

    std::thread::scope(|scope| {
        for _ in 0..width.clamp(1, cases.len().max(1)) {
            let _ = scope.spawn(|| {
                loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some((builder, image)) = cases.get(index) else {
                        break;
                    };
                    let outcome =
                        panic::catch_unwind(AssertUnwindSafe(|| scenario.run(builder, image)))
                            .unwrap_or_else(|_| panicked(builder, image));
                    if let Some(slot) = slots
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .get_mut(index)
                    {
                        *slot = Some(outcome);
                    }
                }
            });
        }
    });

    slots
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .into_iter()
        .zip(cases)
        .map(|(slot, (builder, image))| slot.unwrap_or_else(|| panicked(builder, image)))
        .collect()
}

fn panicked(builder: &BuilderName, image: &ImageName) -> CaseOutcome {
    CaseOutcome::new(
        builder.clone(),
        image.clone(),
        Utc::now(),
        Duration::ZERO,
        Some("case panicked".into()),
    )
}
