//! Request-scoped staging directory.
//!
//! Directories live under the system temp dir as `ytt-files-<random>`.
//! Removal happens exactly once: through [`StagingDirectory::close`] on the
//! success path, or on drop when the request bails out early.

use std::path::Path;

use tempfile::TempDir;

use crate::error::{PipelineError, PipelineResult};

const STAGING_PREFIX: &str = "ytt-files-";

#[derive(Debug)]
pub struct StagingDirectory {
    dir: TempDir,
}

impl StagingDirectory {
    pub fn create() -> PipelineResult<Self> {
        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir()
            .map(|dir| Self { dir })
            .map_err(|source| PipelineError::Directory { source })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory and everything in it, reporting failures.
    pub fn close(self) -> PipelineResult<()> {
        self.dir
            .close()
            .map_err(|source| PipelineError::Directory { source })
    }
}
