//! `pack` CLI image builder.

use smoke_common::error::{Result, SmokeError};
use smoke_common::types::ImageId;

use super::{BuildRequest, BuildResult, ImageBuilder};
use crate::tool;

/// Builds images with `pack build`, then asks the container runtime for
/// the resulting image id.
#[derive(Debug, Clone)]
pub struct PackBuilder {
    pack_binary: String,
    docker_binary: String,
}

impl PackBuilder {
    /// Creates a builder driving the given `pack` and `docker` binaries.
    #[must_use]
    pub fn new(pack_binary: impl Into<String>, docker_binary: impl Into<String>) -> Self {
        Self {
            pack_binary: pack_binary.into(),
            docker_binary: docker_binary.into(),
        }
    }

    fn inspect_image_id(&self, request: &BuildRequest) -> Result<ImageId> {
        let args = vec![
            "image".to_owned(),
            "inspect".to_owned(),
            "--format".to_owned(),
            "{{.Id}}".to_owned(),
            request.image.to_string(),
        ];
        let output = tool::run_tool(&self.docker_binary, &args)?.into_result()?;
        let id = output.stdout.trim();
        if id.is_empty() {
            return Err(SmokeError::NotFound {
                kind: "image",
                id: request.image.to_string(),
            });
        }
        Ok(ImageId::new(id))
    }
}

/// Returns the `pack` arguments for a build request.
#[must_use]
pub fn pack_args(request: &BuildRequest) -> Vec<String> {
    let mut args = vec![
        "build".to_owned(),
        request.image.to_string(),
        "--path".to_owned(),
        request.source.to_string_lossy().into_owned(),
        "--builder".to_owned(),
        request.builder.to_string(),
        "--pull-policy".to_owned(),
        request.pull_policy.clone(),
        "--gid".to_owned(),
        request.group_id.to_string(),
    ];
    for (key, value) in &request.env {
        args.push("--env".to_owned());
        args.push(format!("{key}={value}"));
    }
    args
}

impl ImageBuilder for PackBuilder {
    fn build(&self, request: &BuildRequest) -> Result<BuildResult> {
        tracing::info!(image = %request.image, builder = %request.builder, "pack build");

        let output = tool::run_tool(&self.pack_binary, &pack_args(request))?;
        let log = output.combined();
        if !output.success() {
            return Err(SmokeError::Build {
                image: request.image.to_string(),
                builder: request.builder.to_string(),
                log,
            });
        }

        let image_id = self.inspect_image_id(request)?;
        tracing::info!(image = %request.image, id = %image_id, "image built");
        Ok(BuildResult { image_id, log })
    }
}
