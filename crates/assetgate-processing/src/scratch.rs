//! Scratch staging for encoded variants.
//!
//! A staged file lives under the scratch root only while its variant is being
//! persisted; it is removed when the handle is released or dropped.

use bytes::Bytes;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempPath};

#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the scratch root if it does not exist yet.
    pub fn ensure(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }

    /// Write `data` to a fresh file under the root. Blocking.
    pub fn stage(&self, data: &[u8]) -> io::Result<ScratchFile> {
        self.ensure()?;
        let mut file = Builder::new()
            .prefix("variant-")
            .suffix(".tmp")
            .tempfile_in(&self.root)?;
        file.write_all(data)?;
        file.flush()?;
        Ok(ScratchFile {
            path: file.into_temp_path(),
        })
    }
}

/// A staged artifact, deleted on drop.
#[derive(Debug)]
pub struct ScratchFile {
    path: TempPath,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> io::Result<Bytes> {
        tokio::fs::read(&self.path).await.map(Bytes::from)
    }

    /// Remove the artifact now. Failures are logged, never returned.
    pub fn release(self) {
        let path = self.path.to_path_buf();
        if let Err(e) = self.path.close() {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "Failed to remove scratch file"
            );
        }
    }
}
