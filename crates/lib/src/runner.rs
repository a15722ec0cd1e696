//! Target runner.
//!
//! Building a target:
//! 1. Locates the package directory for the target under the workspace root
//! 2. Evaluates the package's `zel.lua` module
//! 3. Recognizes jobs among the module's exports, in declaration order
//! 4. Runs each job against the package directory, one at a time
//!
//! A job whose bundler reports failure does not stop the jobs after it; its
//! outcome is recorded in the returned [`TargetReport`]. Errors (a missing
//! module, a malformed job, an I/O failure) abort the whole target.

use std::path::{Path, PathBuf};

use mlua::prelude::LuaError;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::bundler::{BuildOutput, Diagnostic};
use crate::consts::MODULE_FILE;
use crate::events::{JobEvent, JobObserver};
use crate::job::{Job, JobContext, JobError};
use crate::lua::{create_runtime, load_module};
use crate::target::Target;

/// Errors that abort a target build.
#[derive(Debug, Error)]
pub enum RunError {
  #[error("package for target {target} not found at {}", path.display())]
  PackageNotFound { target: String, path: PathBuf },

  #[error("no {} in package {}", MODULE_FILE, path.display())]
  ModuleNotFound { path: PathBuf },

  #[error("failed to load {}: {source}", path.display())]
  Module {
    path: PathBuf,
    #[source]
    source: LuaError,
  },

  /// An export is tagged as a job but is not a valid one.
  #[error("export '{export}' is not a valid job: {source}")]
  InvalidJob {
    export: String,
    #[source]
    source: JobError,
  },

  #[error("job '{job}' failed: {source}")]
  Job {
    job: String,
    #[source]
    source: JobError,
  },
}

/// How a single job ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobStatus {
  Succeeded { artifacts: Vec<PathBuf> },
  Failed { diagnostics: Vec<Diagnostic> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobOutcome {
  pub export: String,
  pub job: String,
  #[serde(flatten)]
  pub status: JobStatus,
}

impl JobOutcome {
  fn new(export: &str, job: &str, output: &BuildOutput) -> Self {
    let status = match output {
      BuildOutput::Success { artifacts } => JobStatus::Succeeded {
        artifacts: artifacts.iter().map(|a| a.path.clone()).collect(),
      },
      BuildOutput::Failure { logs } => JobStatus::Failed {
        diagnostics: logs.clone(),
      },
    };
    Self {
      export: export.to_string(),
      job: job.to_string(),
      status,
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self.status, JobStatus::Succeeded { .. })
  }
}

/// Outcomes of every job run for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
  pub target: String,
  pub package_dir: PathBuf,
  pub jobs: Vec<JobOutcome>,
}

impl TargetReport {
  pub fn failed(&self) -> impl Iterator<Item = &JobOutcome> {
    self.jobs.iter().filter(|job| !job.is_success())
  }

  pub fn is_success(&self) -> bool {
    self.failed().next().is_none()
  }
}

/// Locate the package directory of `target`.
pub fn package_dir(workspace_root: &Path, target: &Target) -> Result<PathBuf, RunError> {
  let path = target.package_dir(workspace_root);
  match dunce::canonicalize(&path) {
    Ok(dir) if dir.is_dir() => Ok(dir),
    _ => Err(RunError::PackageNotFound {
      target: target.to_string(),
      path,
    }),
  }
}

/// Evaluate the module in `package_dir` and return the jobs it exports.
///
/// Emits [`JobEvent::Found`] for each job. The Lua VM does not outlive this call.
pub fn discover_jobs(
  package_dir: &Path,
  target: &Target,
  observer: &dyn JobObserver,
) -> Result<Vec<(String, Job)>, RunError> {
  let module_path = package_dir.join(MODULE_FILE);
  if !module_path.is_file() {
    return Err(RunError::ModuleNotFound {
      path: package_dir.to_path_buf(),
    });
  }

  let module_err = |source: LuaError| RunError::Module {
    path: module_path.clone(),
    source,
  };
  let lua = create_runtime(package_dir, target).map_err(module_err)?;
  let exports = load_module(&lua, &module_path).map_err(module_err)?;

  let mut jobs = Vec::new();
  for (export, value) in exports.iter() {
    let job = Job::from_lua(&lua, value).map_err(|source| RunError::InvalidJob {
      export: export.to_string(),
      source,
    })?;

    if let Some(job) = job {
      observer.on_event(&JobEvent::Found {
        export: export.to_string(),
        job: job.name().to_string(),
      });
      jobs.push((export.to_string(), job));
    }
  }

  Ok(jobs)
}

/// Build every job exported by `target`'s module.
pub async fn build_target(
  workspace_root: &Path,
  target: &Target,
  ctx: &JobContext<'_>,
) -> Result<TargetReport, RunError> {
  let package_dir = package_dir(workspace_root, target)?;
  info!(target = %target, package = %package_dir.display(), "building target");

  let jobs = discover_jobs(&package_dir, target, ctx.observer)?;
  if jobs.is_empty() {
    warn!(target = %target, "module exports no jobs");
  }

  let mut outcomes = Vec::with_capacity(jobs.len());
  for (export, job) in &jobs {
    let output = job.run(&package_dir, ctx).await.map_err(|source| RunError::Job {
      job: job.name().to_string(),
      source,
    })?;
    outcomes.push(JobOutcome::new(export, job.name(), &output));
  }

  Ok(TargetReport {
    target: target.to_string(),
    package_dir,
    jobs: outcomes,
  })
}
