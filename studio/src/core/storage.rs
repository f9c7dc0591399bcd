//! On-disk artifact storage.
//!
//! Every assembly run gets its own directory `<root>/<run_id>/` named by a
//! fresh UUID, so concurrent runs never write the same path. Files are
//! written once and never modified.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Artifact not found: {0}")]
    NotFound(String),
    #[error("Invalid artifact name: {0}")]
    InvalidName(String),
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Names used in artifact paths must stay inside their directory.
pub fn is_valid_artifact_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

fn check_name(name: &str) -> StorageResult<()> {
    if is_valid_artifact_name(name) {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}

/// Root directory holding one subdirectory per run.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allocate the directory of a new run.
    pub async fn create_run(&self) -> StorageResult<ArtifactRun> {
        let run_id = Uuid::new_v4().to_string();
        let dir = self.root.join(&run_id);
        tokio::fs::create_dir_all(&dir).await?;
        debug!("Created artifact directory {}", dir.display());
        Ok(ArtifactRun { run_id, dir })
    }

    /// Path of an artifact, after checking both names.
    pub fn resolve(&self, run_id: &str, file_name: &str) -> StorageResult<PathBuf> {
        check_name(run_id)?;
        check_name(file_name)?;
        Ok(self.root.join(run_id).join(file_name))
    }

    pub async fn read(&self, run_id: &str, file_name: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(run_id, file_name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(format!("{run_id}/{file_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Directory of one run.
#[derive(Debug, Clone)]
pub struct ArtifactRun {
    run_id: String,
    dir: PathBuf,
}

impl ArtifactRun {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` to `file_name` inside the run directory.
    pub async fn write(&self, file_name: &str, bytes: &[u8]) -> StorageResult<PathBuf> {
        check_name(file_name)?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}
