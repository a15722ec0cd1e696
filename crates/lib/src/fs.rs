//! Filesystem access used to materialize artifacts.

use std::path::Path;

use async_trait::async_trait;

#[async_trait]
pub trait ArtifactFs: Send + Sync {
  /// Write `content` to `path`, replacing any existing file.
  async fn write(&self, path: &Path, content: &[u8]) -> std::io::Result<()>;

  async fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// The local filesystem. Missing parent directories are created on write.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait]
impl ArtifactFs for LocalFs {
  async fn write(&self, path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await
  }

  async fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
    tokio::fs::read(path).await
  }
}
