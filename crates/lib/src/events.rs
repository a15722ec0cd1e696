//! Job lifecycle events.
//!
//! The runner and jobs report progress through a [`JobObserver`] instead of
//! printing. The CLI supplies an observer that renders to the terminal;
//! [`TracingObserver`] forwards events to `tracing`.

use std::path::PathBuf;

use tracing::{debug, error, info};

use crate::bundler::Diagnostic;
use crate::consts::EMPTY_ARTIFACT;
use crate::job::ResolvedConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
  /// A module export was recognized as a job.
  Found { export: String, job: String },

  /// The job began running.
  Started { job: String },

  /// The job's configuration was resolved and is about to be bundled.
  Resolved { job: String, config: ResolvedConfig },

  /// The bundler reported failure; nothing was written.
  BuildFailed { job: String, logs: Vec<Diagnostic> },

  /// An artifact was written and read back.
  ArtifactWritten {
    job: String,
    path: PathBuf,
    bytes: usize,
    echo: String,
  },

  /// Every artifact was written.
  Finished { job: String, artifacts: usize },
}

impl JobEvent {
  pub fn job(&self) -> &str {
    match self {
      JobEvent::Found { job, .. }
      | JobEvent::Started { job }
      | JobEvent::Resolved { job, .. }
      | JobEvent::BuildFailed { job, .. }
      | JobEvent::ArtifactWritten { job, .. }
      | JobEvent::Finished { job, .. } => job,
    }
  }
}

/// Text echoed for an artifact after it was read back.
pub fn artifact_echo(content: &[u8]) -> String {
  if content.is_empty() {
    EMPTY_ARTIFACT.to_string()
  } else {
    String::from_utf8_lossy(content).into_owned()
  }
}

pub trait JobObserver: Send + Sync {
  fn on_event(&self, event: &JobEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl JobObserver for NullObserver {
  fn on_event(&self, _event: &JobEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl JobObserver for TracingObserver {
  fn on_event(&self, event: &JobEvent) {
    match event {
      JobEvent::Found { export, job } => info!(export = %export, job = %job, "found job"),
      JobEvent::Started { job } => info!(job = %job, "building"),
      JobEvent::Resolved { job, config } => {
        let config = serde_json::to_string(config).unwrap_or_default();
        debug!(job = %job, config = %config, "resolved config");
      }
      JobEvent::BuildFailed { job, logs } => {
        error!(job = %job, diagnostics = logs.len(), "build failed");
        for log in logs {
          error!(job = %job, "{}", log);
        }
      }
      JobEvent::ArtifactWritten { job, path, bytes, echo } => {
        info!(job = %job, path = %path.display(), bytes = *bytes, "wrote artifact");
        debug!(job = %job, path = %path.display(), content = %echo, "artifact content");
      }
      JobEvent::Finished { job, artifacts } => info!(job = %job, artifacts = *artifacts, "done"),
    }
  }
}
