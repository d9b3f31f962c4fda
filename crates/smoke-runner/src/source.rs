//! Per-case copies of the sample application.

use std::path::{Path, PathBuf};

use smoke_common::error::{Result, SmokeError};
use tempfile::TempDir;

/// A private copy of the application source, deleted on close or drop.
#[derive(Debug)]
pub struct StagedSource {
    dir: TempDir,
    root: PathBuf,
}

impl StagedSource {
    /// Copies `fixture` into a fresh temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture is missing or cannot be copied.
    pub fn copy_from(fixture: &Path) -> Result<Self> {
        if !fixture.is_dir() {
            return Err(SmokeError::NotFound {
                kind: "source directory",
                id: fixture.display().to_string(),
            });
        }

        let dir = tempfile::Builder::new()
            .prefix("smoke-source-")
            .tempdir()
            .map_err(|e| SmokeError::Io {
                path: std::env::temp_dir(),
                source: e,
            })?;
        let root = dir.path().join("app");
        copy_tree(fixture, &root)?;
        tracing::debug!(from = %fixture.display(), to = %root.display(), "source staged");

        Ok(Self { dir, root })
    }

    /// Returns the directory holding the copied source.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Deletes the copy, reporting failures that drop would swallow.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be removed.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|e| SmokeError::Io { path, source: e })
    }
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |e| SmokeError::Io { path, source: e }
    };

    std::fs::create_dir_all(to).map_err(io_err(to))?;
    for entry in std::fs::read_dir(from).map_err(io_err(from))? {
        let entry = entry.map_err(io_err(from))?;
        let target = to.join(entry.file_name());
        let file_type = entry.file_type().map_err(io_err(&entry.path()))?;
        if file_type.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            let _ = std::fs::copy(entry.path(), &target).map_err(io_err(&entry.path()))?;
        }
    }
    Ok(())
}
