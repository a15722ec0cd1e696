//! External command bundler.
//!
//! Runs a user-supplied shell command (for example `esbuild --bundle "$@"
//! --outdir="$ZEL_OUTDIR"`) with the resolved configuration exposed as
//! arguments and environment variables:
//!
//! - positional arguments: the absolute entry points, in order
//! - `ZEL_ROOT`: the package directory (also the working directory)
//! - `ZEL_OUTDIR`: a private staging directory the command writes into
//! - `ZEL_ENTRYPOINTS`: the entry points, newline-separated
//! - `ZEL_OPTIONS`: pass-through options as a JSON object
//!
//! Files left in the staging directory become artifacts at the same relative
//! path under the configured output directory.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::{Artifact, BuildOutput, Bundler, BundlerError, Diagnostic};
use crate::job::ResolvedConfig;

#[derive(Debug, Clone)]
pub struct CommandBundler {
  cmd: String,
  shell: Option<String>,
}

impl CommandBundler {
  pub fn new(cmd: &str) -> Self {
    Self {
      cmd: cmd.to_string(),
      shell: None,
    }
  }

  /// Use a specific shell instead of the platform default.
  pub fn with_shell(mut self, shell: &str) -> Self {
    self.shell = Some(shell.to_string());
    self
  }
}

#[async_trait]
impl Bundler for CommandBundler {
  async fn bundle(&self, config: &ResolvedConfig) -> Result<BuildOutput, BundlerError> {
    let staging = tempfile::Builder::new().prefix("zel-out-").tempdir()?;
    let entrypoints = config
      .entrypoints
      .iter()
      .map(|p| p.to_string_lossy().into_owned())
      .collect::<Vec<_>>();

    let (shell, shell_args) = get_shell(self.shell.as_deref());

    let mut command = Command::new(&shell);
    command
      .args(&shell_args)
      .arg(&self.cmd)
      .current_dir(&config.root)
      .env("ZEL_ROOT", &config.root)
      .env("ZEL_OUTDIR", staging.path())
      .env("ZEL_ENTRYPOINTS", entrypoints.join("\n"))
      .env("ZEL_OPTIONS", serde_json::to_string(&config.options)?);

    // sh -c binds the word after the script to $0.
    if shell_args == ["-c"] {
      command.arg("zel");
    }
    command.args(&entrypoints);

    info!(cmd = %self.cmd, root = %config.root.display(), "running bundler command");
    let output = command.output().await.map_err(|source| BundlerError::Spawn {
      cmd: self.cmd.clone(),
      source,
    })?;

    if !output.status.success() {
      let mut logs = Vec::new();
      for line in String::from_utf8_lossy(&output.stdout).lines().filter(|l| !l.trim().is_empty()) {
        logs.push(Diagnostic::info(line));
      }
      for line in String::from_utf8_lossy(&output.stderr).lines().filter(|l| !l.trim().is_empty()) {
        logs.push(Diagnostic::error(line));
      }
      logs.push(Diagnostic::error(match output.status.code() {
        Some(code) => format!("bundler command exited with code {}", code),
        None => "bundler command terminated by signal".to_string(),
      }));
      return Ok(BuildOutput::Failure { logs });
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
      debug!(stderr = %stderr.trim(), "bundler command stderr");
    }

    let staged = staging.path().to_path_buf();
    let outdir = config.outdir.clone();
    let artifacts = tokio::task::spawn_blocking(move || collect_staged(&staged, &outdir))
      .await
      .map_err(std::io::Error::other)??;
    debug!(count = artifacts.len(), "collected staged artifacts");
    Ok(BuildOutput::Success { artifacts })
  }
}

/// Read every file under `staging` into an artifact rooted at `outdir`.
fn collect_staged(staging: &Path, outdir: &Path) -> Result<Vec<Artifact>, BundlerError> {
  let mut artifacts = Vec::new();

  for entry in WalkDir::new(staging).sort_by_file_name() {
    let entry = entry.map_err(std::io::Error::from)?;
    if !entry.file_type().is_file() {
      continue;
    }
    let relative = entry
      .path()
      .strip_prefix(staging)
      .map_err(|e| std::io::Error::other(e.to_string()))?;
    let content = std::fs::read(entry.path())?;
    artifacts.push(Artifact::new(outdir.join(relative), content));
  }

  Ok(artifacts)
}

/// Shell and the flag that passes it a script.
fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
  if let Some(shell) = override_shell {
    let args = if shell.contains("powershell") || shell.contains("pwsh") {
      vec!["-NoProfile".to_string(), "-Command".to_string()]
    } else if shell.contains("cmd") {
      vec!["/C".to_string()]
    } else {
      vec!["-c".to_string()]
    };
    return (shell.to_string(), args);
  }

  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), vec!["-c".to_string()])
  }

  #[cfg(windows)]
  {
    ("cmd.exe".to_string(), vec!["/C".to_string()])
  }
}
