//! Per-case teardown of containers, cache volumes, images, and sources.

use sha2::{Digest, Sha256};
use smoke_common::error::{Result, SmokeError};
use smoke_common::types::{ContainerId, ImageId, ImageName};

use crate::backend::ContainerRuntime;
use crate::source::StagedSource;

/// Names of the cache volumes `pack` creates for an image.
///
/// `pack` keys its volume cache on the fully qualified reference of the
/// image it builds.
#[must_use]
pub fn cache_volume_names(image: &ImageName) -> Vec<String> {
    let reference = format!("index.docker.io/library/{image}:latest");
    let digest = Sha256::digest(reference.as_bytes());
    let short: String = digest[..6].iter().map(|b| format!("{b:02x}")).collect();
    ["build", "launch", "cache"]
        .iter()
        .map(|kind| format!("pack-cache-library_{image}_latest-{short}.{kind}"))
        .collect()
}

/// Removal errors that only mean an earlier step already got there.
fn is_benign_container_error(err: &SmokeError) -> bool {
    err.is_not_found()
        || matches!(err, SmokeError::Tool { stderr, .. } if stderr.contains("name cannot be empty"))
}

fn is_benign_image_error(err: &SmokeError) -> bool {
    err.is_not_found() || matches!(err, SmokeError::Tool { stderr, .. } if stderr.contains("Error"))
}

/// Tracks what a case created and removes it in reverse dependency order.
///
/// Every step is attempted even after a failure; the first failure that is
/// not benign is returned. Running it again is a no-op.
pub struct Cleanup<'a> {
    runtime: &'a dyn ContainerRuntime,
    image_name: ImageName,
    image: Option<ImageId>,
    container: Option<ContainerId>,
    source: Option<StagedSource>,
    volumes_pending: bool,
}

impl<'a> Cleanup<'a> {
    /// Creates a cleanup for the image named `image_name`.
    ///
    /// Until ids are tracked, the container and image are removed by that
    /// name, so a container whose start could not be confirmed and partial
    /// builds are cleaned up too.
    #[must_use]
    pub fn new(runtime: &'a dyn ContainerRuntime, image_name: ImageName) -> Self {
        Self {
            runtime,
            image: Some(ImageId::new(image_name.as_str())),
            container: Some(ContainerId::new(image_name.as_str())),
            image_name,
            source: None,
            volumes_pending: true,
        }
    }

    /// Records the staged source copy.
    pub fn track_source(&mut self, source: StagedSource) {
        self.source = Some(source);
    }

    /// Records the built image.
    pub fn track_image(&mut self, id: ImageId) {
        self.image = Some(id);
    }

    /// Records the started container.
    pub fn track_container(&mut self, id: ContainerId) {
        self.container = Some(id);
    }

    /// Removes everything tracked so far.
    ///
    /// # Errors
    ///
    /// Returns the first removal failure that is not benign.
    pub fn run(&mut self) -> Result<()> {
        let mut first: Option<SmokeError> = None;
        let mut record = |step: &str, result: Result<()>, benign: fn(&SmokeError) -> bool| {
            if let Err(err) = result {
                if benign(&err) {
                    tracing::debug!(step, error = %err, "ignoring benign cleanup error");
                } else {
                    tracing::warn!(step, error = %err, "cleanup step failed");
                    let _ = first.get_or_insert(err);
                }
            }
        };

        if let Some(id) = self.container.take() {
            record(
                "container",
                self.runtime.remove_container(&id),
                is_benign_container_error,
            );
        }

        if self.volumes_pending {
            self.volumes_pending = false;
            let names = cache_volume_names(&self.image_name);
            record(
                "volumes",
                self.runtime.remove_volumes(&names),
                SmokeError::is_not_found,
            );
        }

        if let Some(id) = self.image.take() {
            record("image", self.runtime.remove_image(&id), is_benign_image_error);
        }

        if let Some(source) = self.source.take() {
            record("source", source.close(), |_| false);
        }

        tracing::debug!(image = %self.image_name, "cleanup finished");
        first.map_or(Ok(()), Err)
    }
}
