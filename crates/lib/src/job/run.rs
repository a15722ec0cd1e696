//! Job execution.

use std::path::Path;

use tracing::debug;

use super::{Job, JobError, resolve_config};
use crate::bundler::{BuildOutput, Bundler};
use crate::events::{JobEvent, JobObserver, artifact_echo};
use crate::fs::ArtifactFs;

/// Collaborators a job runs against.
#[derive(Clone, Copy)]
pub struct JobContext<'a> {
  pub bundler: &'a dyn Bundler,
  pub fs: &'a dyn ArtifactFs,
  pub observer: &'a dyn JobObserver,
}

impl<'a> JobContext<'a> {
  pub fn new(bundler: &'a dyn Bundler, fs: &'a dyn ArtifactFs, observer: &'a dyn JobObserver) -> Self {
    Self { bundler, fs, observer }
  }
}

impl Job {
  /// Resolve the job against `base_dir`, bundle it, and write its artifacts.
  ///
  /// A bundler-reported failure is returned as `Ok(BuildOutput::Failure)`
  /// without writing anything. On success each artifact is written and read
  /// back before the next one is started. The bundler's output is returned
  /// unchanged in both cases.
  pub async fn run(&self, base_dir: &Path, ctx: &JobContext<'_>) -> Result<BuildOutput, JobError> {
    let name = self.name().to_string();
    ctx.observer.on_event(&JobEvent::Started { job: name.clone() });

    let config = resolve_config(base_dir, self.config())?;
    ctx.observer.on_event(&JobEvent::Resolved {
      job: name.clone(),
      config: config.clone(),
    });

    let output = ctx.bundler.bundle(&config).await?;

    let artifacts = match &output {
      BuildOutput::Failure { logs } => {
        ctx.observer.on_event(&JobEvent::BuildFailed {
          job: name,
          logs: logs.clone(),
        });
        return Ok(output);
      }
      BuildOutput::Success { artifacts } => artifacts,
    };

    for artifact in artifacts {
      debug!(job = %name, path = %artifact.path.display(), "writing artifact");
      ctx
        .fs
        .write(&artifact.path, &artifact.content)
        .await
        .map_err(|source| JobError::Io {
          path: artifact.path.clone(),
          source,
        })?;

      let written = ctx.fs.read(&artifact.path).await.map_err(|source| JobError::Io {
        path: artifact.path.clone(),
        source,
      })?;

      ctx.observer.on_event(&JobEvent::ArtifactWritten {
        job: name.clone(),
        path: artifact.path.clone(),
        bytes: written.len(),
        echo: artifact_echo(&written),
      });
    }

    ctx.observer.on_event(&JobEvent::Finished {
      job: name,
      artifacts: artifacts.len(),
    });

    Ok(output)
  }
}
