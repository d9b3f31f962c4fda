//! One builder's build-run-probe case.

use std::time::{Duration, Instant};

use chrono::Utc;
use smoke_common::config::SmokeConfig;
use smoke_common::error::Result;
use smoke_common::types::{BuilderName, ImageName};

use crate::backend::{BuildRequest, ContainerRuntime, ImageBuilder};
use crate::cleanup::Cleanup;
use crate::health::HealthProbe;
use crate::logs;
use crate::report::CaseOutcome;
use crate::source::StagedSource;

/// Runs the Maven case against a builder and a container runtime.
#[derive(Clone, Copy)]
pub struct Scenario<'a> {
    config: &'a SmokeConfig,
    builder: &'a dyn ImageBuilder,
    runtime: &'a dyn ContainerRuntime,
}

impl<'a> Scenario<'a> {
    /// Creates a scenario over borrowed backends.
    #[must_use]
    pub fn new(
        config: &'a SmokeConfig,
        builder: &'a dyn ImageBuilder,
        runtime: &'a dyn ContainerRuntime,
    ) -> Self {
        Self {
            config,
            builder,
            runtime,
        }
    }

    /// Runs the case for `builder` using `image` as image and container name.
    ///
    /// Cleanup always runs. A cleanup failure fails an otherwise passing
    /// case and is appended to an existing failure.
    pub fn run(&self, builder: &BuilderName, image: &ImageName) -> CaseOutcome {
        let started_at = Utc::now();
        let clock = Instant::now();
        tracing::info!(builder = %builder, image = %image, "case started");

        let mut cleanup = Cleanup::new(self.runtime, image.clone());
        let result = self.execute(builder, image, &mut cleanup);
        let cleaned = cleanup.run();

        let error = match (result, cleaned) {
            (Ok(()), Ok(())) => None,
            (Err(e), Ok(())) => Some(e.to_string()),
            (Ok(()), Err(c)) => Some(format!("cleanup failed: {c}")),
            (Err(e), Err(c)) => Some(format!("{e}\ncleanup failed: {c}")),
        };

        match &error {
            None => tracing::info!(builder = %builder, "case passed"),
            Some(message) => tracing::error!(builder = %builder, error = %message, "case failed"),
        }
        CaseOutcome::new(builder.clone(), image.clone(), started_at, clock.elapsed(), error)
    }

    fn execute(
        &self,
        builder: &BuilderName,
        image: &ImageName,
        cleanup: &mut Cleanup<'_>,
    ) -> Result<()> {
        let staged = StagedSource::copy_from(&self.config.source_dir)?;
        let source = staged.path().to_path_buf();
        cleanup.track_source(staged);

        let request = BuildRequest {
            image: image.clone(),
            source,
            builder: builder.clone(),
            pull_policy: self.config.pull_policy.clone(),
            group_id: self.config.group_id,
            env: self.config.build_env.clone(),
        };
        let build = self.builder.build(&request)?;
        cleanup.track_image(build.image_id.clone());

        logs::assert_in_order(&build.log, self.config.expected_buildpacks.as_slice())?;

        let container = self
            .runtime
            .run(&build.image_id, image, self.config.container_port)?;
        cleanup.track_container(container.id.clone());

        let url = format!(
            "http://{}:{}{}",
            self.config.health_host, container.host_port, self.config.health_path
        );
        let probe = HealthProbe::new(url, self.config.health_needle.clone())
            .with_timeout(Duration::from_secs(self.config.health_timeout_secs))
            .with_interval(Duration::from_millis(self.config.health_poll_interval_ms));

        if let Err(err) = probe.wait() {
            match self.runtime.logs(&container.id) {
                Ok(output) => tracing::warn!(container = %container.id, logs = %output, "unhealthy container"),
                Err(e) => tracing::warn!(container = %container.id, error = %e, "cannot read container logs"),
            }
            return Err(err);
        }
        Ok(())
    }
}
