//! `smoke run` — Build, run, and health-check the sample app per builder.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use smoke_common::config::SmokeConfig;
use smoke_common::constants::BUILDERS_ENV;
use smoke_common::error::SmokeError;
use smoke_common::types::BuilderName;
use smoke_runner::suite::Suite;

use crate::output;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Builder to test; repeat the flag to test several.
    #[arg(
        short = 'n',
        long = "name",
        value_name = "BUILDER",
        env = BUILDERS_ENV,
        value_delimiter = ','
    )]
    pub names: Vec<BuilderName>,

    /// Sample application to build.
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Run cases one after another instead of in parallel.
    #[arg(long)]
    pub serial: bool,

    /// Maximum number of cases running at once.
    #[arg(long, value_name = "N")]
    pub max_parallel: Option<usize>,

    /// Seconds to wait for the health endpoint.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Write a JSON report of every case to this path.
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// JSON configuration file; flags override its values.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    fn resolve_config(&self) -> anyhow::Result<SmokeConfig> {
        let mut config = match &self.config {
            Some(path) => SmokeConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SmokeConfig::default(),
        };
        if let Some(source) = &self.source {
            config.source_dir.clone_from(source);
        }
        if self.serial {
            config.serial = true;
        }
        if let Some(n) = self.max_parallel {
            config.max_parallel = n;
        }
        if let Some(secs) = self.timeout_secs {
            config.health_timeout_secs = secs;
        }
        Ok(config)
    }
}

/// Executes the `run` command.
///
/// # Errors
///
/// Returns an error if no builders are given, the tools are missing, or
/// any case fails.
pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    if args.names.is_empty() {
        return Err(SmokeError::NoBuilders.into());
    }
    let config = args.resolve_config()?;
    tracing::info!(
        builders = args.names.len(),
        source = %config.source_dir.display(),
        "starting smoke run"
    );

    let suite = Suite::with_cli_tools(config)?;
    let report = suite.run(&args.names)?;

    println!("{}", output::render_summary(&report));

    if let Some(path) = &args.report {
        report
            .write_json(path)
            .with_context(|| format!("writing report {}", path.display()))?;
        tracing::info!(path = %path.display(), "report written");
    }

    if !report.all_passed() {
        anyhow::bail!(
            "{} of {} smoke cases failed",
            report.failed(),
            report.cases.len()
        );
    }
    Ok(())
}
