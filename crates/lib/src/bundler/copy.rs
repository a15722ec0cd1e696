//! Native copy bundler.
//!
//! Emits every entry point unchanged as `<outdir>/<file name>`. It performs no
//! transforms, which makes it the default for packages that only need their
//! sources staged, and a predictable bundler for tests.

use std::collections::HashMap;
use std::io::ErrorKind;

use async_trait::async_trait;
use tracing::debug;

use super::{Artifact, BuildOutput, Bundler, BundlerError, Diagnostic};
use crate::job::ResolvedConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct CopyBundler;

impl CopyBundler {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl Bundler for CopyBundler {
  async fn bundle(&self, config: &ResolvedConfig) -> Result<BuildOutput, BundlerError> {
    let mut artifacts = Vec::with_capacity(config.entrypoints.len());
    let mut logs = Vec::new();
    let mut claimed = HashMap::new();

    if config.entrypoints.is_empty() {
      logs.push(Diagnostic::error("no entry points given"));
    }

    for entry in &config.entrypoints {
      let Some(file_name) = entry.file_name() else {
        logs.push(Diagnostic::error(format!("entry point has no file name: {}", entry.display())));
        continue;
      };

      if let Some(previous) = claimed.insert(file_name.to_os_string(), entry.clone()) {
        logs.push(Diagnostic::error(format!(
          "entry points {} and {} both map to output {}",
          previous.display(),
          entry.display(),
          file_name.to_string_lossy()
        )));
        continue;
      }

      match tokio::fs::read(entry).await {
        Ok(content) => {
          debug!(entry = %entry.display(), bytes = content.len(), "read entry point");
          artifacts.push(Artifact::new(config.outdir.join(file_name), content));
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
          logs.push(Diagnostic::error(format!("could not resolve entry point: {}", entry.display())));
        }
        Err(e) => {
          logs.push(Diagnostic::error(format!("could not read entry point {}: {}", entry.display(), e)));
        }
      }
    }

    if logs.is_empty() {
      Ok(BuildOutput::Success { artifacts })
    } else {
      Ok(BuildOutput::Failure { logs })
    }
  }
}
