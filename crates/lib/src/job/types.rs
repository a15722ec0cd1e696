use std::collections::BTreeMap;
use std::path::PathBuf;

use mlua::prelude::LuaError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bundler::BundlerError;
use crate::job::ResolveError;

/// Bundler options that zel does not interpret.
pub type Options = BTreeMap<String, serde_json::Value>;

/// A job's configuration as declared, with paths relative to its package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
  pub entrypoints: Vec<String>,
  pub outdir: String,
  #[serde(flatten)]
  pub options: Options,
}

impl JobConfig {
  pub fn new<I, S>(entrypoints: I, outdir: &str) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      entrypoints: entrypoints.into_iter().map(Into::into).collect(),
      outdir: outdir.to_string(),
      options: BTreeMap::new(),
    }
  }

  pub fn with_option(mut self, key: &str, value: serde_json::Value) -> Self {
    self.options.insert(key.to_string(), value);
    self
  }
}

/// A job's configuration with every path anchored at a base directory.
///
/// Produced by [`resolve_config`](crate::job::resolve_config) for a single run
/// and dropped when that run completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
  pub root: PathBuf,
  pub entrypoints: Vec<PathBuf>,
  pub outdir: PathBuf,
  pub options: Options,
}

/// A bundling job: a name and the configuration it builds.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleJob {
  pub name: String,
  pub config: JobConfig,
}

/// A runnable unit recognized among a target module's exports.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
  Bundle(BundleJob),
}

impl Job {
  /// Create a bundling job, generating a name when none is given.
  ///
  /// Generated names are random and not checked for collisions.
  pub fn app(name: Option<String>, config: JobConfig) -> Self {
    let name = name.filter(|n| !n.is_empty()).unwrap_or_else(generate_name);
    Job::Bundle(BundleJob { name, config })
  }

  pub fn name(&self) -> &str {
    match self {
      Job::Bundle(job) => &job.name,
    }
  }

  pub fn config(&self) -> &JobConfig {
    match self {
      Job::Bundle(job) => &job.config,
    }
  }
}

/// Generate a job name for jobs declared without one.
pub fn generate_name() -> String {
  format!("job-{:08x}", rand::random::<u32>())
}

/// Errors that can occur while recognizing or running a job.
#[derive(Debug, Error)]
pub enum JobError {
  /// A tagged job whose configuration has the wrong shape.
  #[error("invalid job '{job}': {message}")]
  InvalidConfig { job: String, message: String },

  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error("bundler error: {0}")]
  Bundler(#[from] BundlerError),

  /// Writing or reading back an artifact failed.
  #[error("io error on {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("lua error: {0}")]
  Lua(#[from] LuaError),
}
