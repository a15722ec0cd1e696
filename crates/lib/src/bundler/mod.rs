//! Bundlers.
//!
//! A bundler turns a [`ResolvedConfig`] into either a list of artifacts or a
//! list of diagnostics. A bundler-reported failure is ordinary data
//! ([`BuildOutput::Failure`]); only problems driving the bundler itself (for
//! example a command that cannot be spawned) are [`BundlerError`]s.
//!
//! # Submodules
//!
//! - [`cmd`] - Delegates to an external command
//! - [`copy`] - Native bundler that emits each entry point unchanged

pub mod cmd;
pub mod copy;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::job::ResolvedConfig;

pub use cmd::CommandBundler;
pub use copy::CopyBundler;

#[async_trait]
pub trait Bundler: Send + Sync {
  /// Bundle a resolved configuration.
  async fn bundle(&self, config: &ResolvedConfig) -> Result<BuildOutput, BundlerError>;
}

/// Errors raised while driving a bundler.
#[derive(Debug, Error)]
pub enum BundlerError {
  #[error("failed to spawn bundler command '{cmd}': {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to serialize options: {0}")]
  Options(#[from] serde_json::Error),
}

/// One file produced by a bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
  pub path: PathBuf,
  #[serde(skip)]
  pub content: Vec<u8>,
}

impl Artifact {
  pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
    Self {
      path: path.into(),
      content: content.into(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
  Error,
  Warning,
  Info,
}

impl fmt::Display for DiagnosticLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      DiagnosticLevel::Error => "error",
      DiagnosticLevel::Warning => "warning",
      DiagnosticLevel::Info => "info",
    };
    f.write_str(s)
  }
}

/// A log entry reported by a bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
  pub level: DiagnosticLevel,
  pub message: String,
}

impl Diagnostic {
  pub fn error(message: impl Into<String>) -> Self {
    Self {
      level: DiagnosticLevel::Error,
      message: message.into(),
    }
  }

  pub fn info(message: impl Into<String>) -> Self {
    Self {
      level: DiagnosticLevel::Info,
      message: message.into(),
    }
  }
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.level, self.message)
  }
}

/// What a bundler reports for one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutput {
  Success { artifacts: Vec<Artifact> },
  Failure { logs: Vec<Diagnostic> },
}

impl BuildOutput {
  pub fn is_success(&self) -> bool {
    matches!(self, BuildOutput::Success { .. })
  }

  pub fn artifacts(&self) -> &[Artifact] {
    match self {
      BuildOutput::Success { artifacts } => artifacts,
      BuildOutput::Failure { .. } => &[],
    }
  }

  pub fn logs(&self) -> &[Diagnostic] {
    match self {
      BuildOutput::Success { .. } => &[],
      BuildOutput::Failure { logs } => logs,
    }
  }
}
