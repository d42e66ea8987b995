//! Destination tree of a dump
//!
//! Files are only ever added or overwritten; nothing under the root is
//! removed except the temporary copy of the index this run wrote itself.

use crate::artifacts::dump::path_guard;
use anyhow::Context;
use fake::rand;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Create the root directory if needed and anchor the workspace to its absolute path
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Unable to create destination directory {}", path.display()))?;
        let path = path
            .canonicalize()
            .with_context(|| format!("Unable to resolve destination directory {}", path.display()))?;

        Ok(Workspace::new(path.into_boxed_path()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether an index name may be materialized below this root
    pub fn is_safe(&self, name: &str) -> bool {
        path_guard::is_safe(&self.path, name)
    }

    /// Write `data` to `root/name`, creating parents and replacing any existing file.
    ///
    /// Concurrent writers creating the same parent directory are fine.
    pub async fn write_file(&self, name: &str, data: &[u8]) -> std::io::Result<()> {
        let file_path = self.path.join(name);

        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&file_path, data).await
    }

    /// Persist the downloaded index under a fresh temporary name
    pub fn write_index_artifact(&self, data: &[u8]) -> anyhow::Result<PathBuf> {
        let artifact_path = self.path.join(Self::generate_temp_name());

        std::fs::write(&artifact_path, data).with_context(|| {
            format!(
                "Unable to write temporary index file {}",
                artifact_path.display()
            )
        })?;

        Ok(artifact_path)
    }

    pub fn remove_index_artifact(&self, artifact_path: &Path) -> anyhow::Result<()> {
        if artifact_path.exists() {
            std::fs::remove_file(artifact_path).with_context(|| {
                format!(
                    "Unable to remove temporary index file {}",
                    artifact_path.display()
                )
            })?;
        }

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-index-{}", rand::random::<u32>())
    }
}
