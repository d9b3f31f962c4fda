//! Configuration model for a smoke run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{Result, SmokeError};

/// Root configuration for a smoke run.
///
/// Every field has a default, so a partial JSON file only overrides what
/// it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    /// Image builder CLI (`pack`).
    pub pack_binary: String,
    /// Container runtime CLI (`docker`).
    pub docker_binary: String,
    /// Sample application copied into each case.
    pub source_dir: PathBuf,
    /// Image pull policy passed to the builder.
    pub pull_policy: String,
    /// Numeric group id passed to the builder.
    pub group_id: u32,
    /// Build-time environment, in order.
    pub build_env: Vec<(String, String)>,
    /// Buildpacks that must appear in the build log, in order.
    pub expected_buildpacks: Vec<String>,
    /// Port published from the container.
    pub container_port: u16,
    /// Host used to reach published ports.
    pub health_host: String,
    /// Path probed for health.
    pub health_path: String,
    /// Substring a healthy body must contain.
    pub health_needle: String,
    /// Health polling deadline in seconds.
    pub health_timeout_secs: u64,
    /// Delay between probes in milliseconds.
    pub health_poll_interval_ms: u64,
    /// Run cases one after another.
    pub serial: bool,
    /// Upper bound on concurrently running cases; `0` means one per builder.
    pub max_parallel: usize,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            pack_binary: constants::PACK_BINARY.into(),
            docker_binary: constants::DOCKER_BINARY.into(),
            source_dir: PathBuf::from(constants::DEFAULT_SOURCE_DIR),
            pull_policy: constants::PULL_POLICY.into(),
            group_id: constants::BUILD_GROUP_ID,
            build_env: vec![("BP_JVM_VERSION".into(), constants::JVM_VERSION.into())],
            expected_buildpacks: constants::EXPECTED_BUILDPACKS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            container_port: constants::CONTAINER_PORT,
            health_host: "localhost".into(),
            health_path: constants::HEALTH_PATH.into(),
            health_needle: constants::HEALTH_NEEDLE.into(),
            health_timeout_secs: constants::HEALTH_TIMEOUT_SECS,
            health_poll_interval_ms: constants::HEALTH_POLL_INTERVAL_MS,
            serial: false,
            max_parallel: 0,
        }
    }
}

impl SmokeConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SmokeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would make every case fail for a trivial reason.
    ///
    /// # Errors
    ///
    /// Returns `SmokeError::Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.health_poll_interval_ms == 0 {
            return Err(SmokeError::Config {
                message: "health_poll_interval_ms must be greater than zero".into(),
            });
        }
        if self.container_port == 0 {
            return Err(SmokeError::Config {
                message: "container_port must be greater than zero".into(),
            });
        }
        if !self.health_path.starts_with('/') {
            return Err(SmokeError::Config {
                message: format!("health_path must start with '/': {}", self.health_path),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_maven_scenario() {
        let cfg = SmokeConfig::default();
        assert_eq!(cfg.pull_policy, "never");
        assert_eq!(cfg.group_id, 123);
        assert_eq!(
            cfg.build_env,
            vec![("BP_JVM_VERSION".to_owned(), "17".to_owned())]
        );
        assert_eq!(cfg.expected_buildpacks.len(), 5);
        assert_eq!(cfg.health_timeout_secs, 60);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn load_applies_partial_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("smoke.json");
        std::fs::write(&path, r#"{ "docker_binary": "podman", "serial": true }"#).expect("write");

        let cfg = SmokeConfig::load(&path).expect("load");
        assert_eq!(cfg.docker_binary, "podman");
        assert!(cfg.serial);
        assert_eq!(cfg.pack_binary, "pack");
    }

    #[test]
    fn load_rejects_zero_interval() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("smoke.json");
        std::fs::write(&path, r#"{ "health_poll_interval_ms": 0 }"#).expect("write");

        let err = SmokeConfig::load(&path).unwrap_err();
        assert!(matches!(err, SmokeError::Config { .. }));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = SmokeConfig::load(Path::new("/nonexistent/smoke.json")).unwrap_err();
        assert!(matches!(err, SmokeError::Io { .. }));
    }
}
