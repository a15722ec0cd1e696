//! Invocation settings.
//!
//! Each setting is taken from the first source that provides it:
//! an explicit value (CLI flag), then the environment, then discovery or a
//! default.
//!
//! | Setting        | Environment        | Fallback                                      |
//! |----------------|--------------------|-----------------------------------------------|
//! | workspace root | `ZEL_WORKSPACE`    | nearest ancestor with a `ZEL_WORKSPACE` file, else cwd |
//! | bundler        | `ZEL_BUNDLER_CMD`  | the native copy bundler                       |

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::bundler::{Bundler, CommandBundler, CopyBundler};
use crate::consts::{BUNDLER_CMD_ENV, WORKSPACE_ENV, WORKSPACE_MARKER};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("cannot determine current directory: {0}")]
  CurrentDir(#[source] std::io::Error),

  #[error("workspace root {} does not exist: {source}", path.display())]
  WorkspaceRoot {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Which bundler jobs are handed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundlerKind {
  Copy,
  Command(String),
}

impl BundlerKind {
  pub fn into_bundler(self) -> Box<dyn Bundler> {
    match self {
      BundlerKind::Copy => Box::new(CopyBundler::new()),
      BundlerKind::Command(cmd) => Box::new(CommandBundler::new(&cmd)),
    }
  }

  pub fn describe(&self) -> String {
    match self {
      BundlerKind::Copy => "copy".to_string(),
      BundlerKind::Command(cmd) => format!("command: {}", cmd),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub workspace_root: PathBuf,
  pub bundler: BundlerKind,
}

impl Settings {
  /// Resolve settings from explicit values, the environment and the current directory.
  pub fn resolve(workspace: Option<&Path>, bundler_cmd: Option<&str>) -> Result<Self, ConfigError> {
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    let settings = Self {
      workspace_root: workspace_root(workspace, &cwd)?,
      bundler: bundler_kind(bundler_cmd),
    };
    debug!(
      workspace = %settings.workspace_root.display(),
      bundler = %settings.bundler.describe(),
      "resolved settings"
    );
    Ok(settings)
  }
}

fn workspace_root(explicit: Option<&Path>, cwd: &Path) -> Result<PathBuf, ConfigError> {
  let root = explicit
    .map(Path::to_path_buf)
    .or_else(|| non_empty_env(WORKSPACE_ENV).map(PathBuf::from))
    .or_else(|| find_workspace_root(cwd))
    .unwrap_or_else(|| cwd.to_path_buf());

  let root = if root.is_relative() { cwd.join(root) } else { root };
  dunce::canonicalize(&root).map_err(|source| ConfigError::WorkspaceRoot { path: root, source })
}

fn bundler_kind(explicit: Option<&str>) -> BundlerKind {
  explicit
    .map(str::to_string)
    .or_else(|| non_empty_env(BUNDLER_CMD_ENV))
    .filter(|cmd| !cmd.trim().is_empty())
    .map(BundlerKind::Command)
    .unwrap_or(BundlerKind::Copy)
}

/// Nearest directory at or above `start` containing the workspace marker file.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
  start
    .ancestors()
    .find(|dir| dir.join(WORKSPACE_MARKER).is_file())
    .map(Path::to_path_buf)
}

fn non_empty_env(name: &str) -> Option<String> {
  std::env::var(name).ok().filter(|v| !v.is_empty())
}
