//! `docker` CLI container runtime.

use std::collections::HashMap;

use serde::Deserialize;
use smoke_common::error::{Result, SmokeError};
use smoke_common::types::{ContainerId, ImageId, ImageName};

use super::{ContainerRuntime, RunningContainer, classify_removal};
use crate::tool;

/// Container runtime backed by the `docker` CLI.
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    binary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerInspect {
    network_settings: NetworkSettings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NetworkSettings {
    #[serde(default)]
    ports: HashMap<String, Option<Vec<PortBinding>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PortBinding {
    host_port: String,
}

impl DockerRuntime {
    /// Creates a runtime driving the given binary.
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn docker(&self, args: &[&str]) -> Result<tool::ToolOutput> {
        let args: Vec<String> = args.iter().map(|a| (*a).to_owned()).collect();
        tool::run_tool(&self.binary, &args)
    }
}

/// Extracts the host port bound to `container_port/tcp` from
/// `docker container inspect` output.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or the port is not published.
pub fn published_port(inspect_json: &str, container_port: u16) -> Result<u16> {
    let inspected: Vec<ContainerInspect> = serde_json::from_str(inspect_json)?;
    let key = format!("{container_port}/tcp");
    let not_published = || SmokeError::NotFound {
        kind: "published port",
        id: key.clone(),
    };

    let binding = inspected
        .first()
        .and_then(|c| c.network_settings.ports.get(&key))
        .and_then(Option::as_ref)
        .and_then(|bindings| bindings.first())
        .ok_or_else(not_published)?;

    binding
        .host_port
        .parse()
        .map_err(|_| SmokeError::Config {
            message: format!("invalid host port '{}' for {key}", binding.host_port),
        })
}

impl ContainerRuntime for DockerRuntime {
    fn run(
        &self,
        image: &ImageId,
        name: &ImageName,
        container_port: u16,
    ) -> Result<RunningContainer> {
        let port = container_port.to_string();
        let output = self
            .docker(&[
                "container",
                "run",
                "--detach",
                "--name",
                name.as_str(),
                "--publish",
                port.as_str(),
                image.as_str(),
            ])?
            .into_result()?;
        let id = ContainerId::new(output.stdout.trim());
        tracing::info!(id = %id, image = %image, "container started");

        let inspect = self
            .docker(&["container", "inspect", id.as_str()])?
            .into_result()?;
        let host_port = published_port(&inspect.stdout, container_port)?;
        tracing::debug!(id = %id, host_port, "published port resolved");

        Ok(RunningContainer { id, host_port })
    }

    fn logs(&self, id: &ContainerId) -> Result<String> {
        let output = self
            .docker(&["container", "logs", id.as_str()])?
            .into_result()?;
        Ok(output.combined())
    }

    fn remove_container(&self, id: &ContainerId) -> Result<()> {
        let output = self.docker(&["container", "rm", "--force", "--volumes", id.as_str()])?;
        classify_removal("container", id.as_str(), output)
    }

    fn remove_volumes(&self, names: &[String]) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        let mut args = vec!["volume", "rm", "--force"];
        args.extend(names.iter().map(String::as_str));
        let output = self.docker(&args)?;
        classify_removal("volume", &names.join(" "), output)
    }

    fn remove_image(&self, id: &ImageId) -> Result<()> {
        let output = self.docker(&["image", "rm", "--force", id.as_str()])?;
        classify_removal("image", id.as_str(), output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSPECT: &str = r#"[
        {
            "Id": "4f1c",
            "NetworkSettings": {
                "Ports": {
                    "8080/tcp": [
                        { "HostIp": "0.0.0.0", "HostPort": "49153" },
                        { "HostIp": "::", "HostPort": "49153" }
                    ],
                    "9090/tcp": null
                }
            }
        }
    ]"#;

    #[test]
    fn published_port_reads_first_binding() {
        assert_eq!(published_port(INSPECT, 8080).unwrap(), 49153);
    }

    #[test]
    fn unpublished_port_is_not_found() {
        assert!(published_port(INSPECT, 9090).unwrap_err().is_not_found());
        assert!(published_port(INSPECT, 1234).unwrap_err().is_not_found());
    }

    #[test]
    fn malformed_inspect_is_serialization_error() {
        let err = published_port("not json", 8080).unwrap_err();
        assert!(matches!(err, SmokeError::Serialization { .. }));
    }

    #[test]
    fn empty_inspect_array_is_not_found() {
        assert!(published_port("[]", 8080).unwrap_err().is_not_found());
    }
}
