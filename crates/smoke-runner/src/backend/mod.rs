//! Image builder and container runtime abstraction.
//!
//! Scenarios only talk to these traits, so the `pack` and `docker` CLIs
//! can be replaced in tests.

pub mod docker;
pub mod pack;

use std::path::PathBuf;

use smoke_common::error::{Result, SmokeError};
use smoke_common::types::{BuilderName, ContainerId, ImageId, ImageName};

use crate::tool::ToolOutput;

/// Everything the builder needs to produce one image.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Name given to the resulting image.
    pub image: ImageName,
    /// Application source directory.
    pub source: PathBuf,
    /// Builder to build with.
    pub builder: BuilderName,
    /// Image pull policy.
    pub pull_policy: String,
    /// Numeric group id for the build.
    pub group_id: u32,
    /// Build-time environment variables.
    pub env: Vec<(String, String)>,
}

/// A successfully built image.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Image identifier reported by the runtime.
    pub image_id: ImageId,
    /// Full build output.
    pub log: String,
}

/// A started container and where to reach it.
#[derive(Debug, Clone)]
pub struct RunningContainer {
    /// Container identifier.
    pub id: ContainerId,
    /// Host port the container port is published on.
    pub host_port: u16,
}

/// Produces container images from application source.
pub trait ImageBuilder: Send + Sync {
    /// Builds an image.
    ///
    /// # Errors
    ///
    /// Returns `SmokeError::Build` with the captured log if the build fails.
    fn build(&self, request: &BuildRequest) -> Result<BuildResult>;
}

/// Runs and removes containers, images, and volumes.
pub trait ContainerRuntime: Send + Sync {
    /// Starts a detached container publishing `container_port` on a random
    /// host port.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be started or inspected.
    fn run(
        &self,
        image: &ImageId,
        name: &ImageName,
        container_port: u16,
    ) -> Result<RunningContainer>;

    /// Returns the container's output so far.
    ///
    /// # Errors
    ///
    /// Returns an error if logs cannot be retrieved.
    fn logs(&self, id: &ContainerId) -> Result<String>;

    /// Removes a container, stopping it first.
    ///
    /// # Errors
    ///
    /// Returns `SmokeError::NotFound` if the container no longer exists.
    fn remove_container(&self, id: &ContainerId) -> Result<()>;

    /// Removes volumes; missing volumes are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing volume cannot be removed.
    fn remove_volumes(&self, names: &[String]) -> Result<()>;

    /// Removes an image.
    ///
    /// # Errors
    ///
    /// Returns `SmokeError::NotFound` if the image no longer exists.
    fn remove_image(&self, id: &ImageId) -> Result<()>;
}

/// Maps the output of a removal command to a result.
///
/// Runtimes report already-removed resources with a "No such ..." message;
/// that case becomes `SmokeError::NotFound` so cleanup can tolerate it
/// without matching strings itself.
///
/// # Errors
///
/// Returns `SmokeError::NotFound` or `SmokeError::Tool` on failure.
pub fn classify_removal(kind: &'static str, id: &str, output: ToolOutput) -> Result<()> {
    if output.success() {
        return Ok(());
    }
    if output.stderr.to_ascii_lowercase().contains("no such") {
        return Err(SmokeError::NotFound {
            kind,
            id: id.to_owned(),
        });
    }
    Err(output.into_error())
}
