//! HTTP health polling.

use std::time::{Duration, Instant};

use smoke_common::constants;
use smoke_common::error::{Result, SmokeError};

/// Per-request timeout, so one hung connection cannot eat the deadline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Polls a URL until its body contains a marker string.
#[derive(Debug, Clone)]
pub struct HealthProbe {
    url: String,
    needle: String,
    timeout: Duration,
    interval: Duration,
}

impl HealthProbe {
    /// Creates a probe with the default 60 second deadline and one second
    /// interval.
    #[must_use]
    pub fn new(url: impl Into<String>, needle: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            needle: needle.into(),
            timeout: Duration::from_secs(constants::HEALTH_TIMEOUT_SECS),
            interval: Duration::from_millis(constants::HEALTH_POLL_INTERVAL_MS),
        }
    }

    /// Sets the overall deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the delay between probes.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Returns the probed URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Probes until a body contains the needle or the deadline passes.
    ///
    /// Connection errors and non-matching bodies are retried.
    ///
    /// # Errors
    ///
    /// Returns `SmokeError::HealthTimeout` with the last observed response
    /// once the deadline passes.
    pub fn wait(&self) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .no_proxy()
            .timeout(REQUEST_TIMEOUT.min(self.timeout.max(self.interval)))
            .build()
            .map_err(|e| SmokeError::Config {
                message: format!("cannot build HTTP client: {e}"),
            })?;

        let deadline = Instant::now() + self.timeout;
        let mut last = String::from("no response");
        let mut attempts = 0_u32;

        loop {
            attempts += 1;
            match client.get(&self.url).send().and_then(|r| r.text()) {
                Ok(body) if body.contains(&self.needle) => {
                    tracing::info!(url = %self.url, attempts, "healthy");
                    return Ok(body);
                }
                Ok(body) => last = body,
                Err(e) => last = e.to_string(),
            }
            tracing::trace!(url = %self.url, attempts, last = %last, "not healthy yet");

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep(self.interval.min(deadline - now));
        }

        Err(SmokeError::HealthTimeout {
            url: self.url.clone(),
            timeout: self.timeout,
            last,
        })
    }
}
