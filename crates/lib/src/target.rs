//! Target labels.
//!
//! A target is a slash-delimited path from the workspace root to a package
//! directory, optionally prefixed with `//`:
//!
//! ```text
//! //apps/web    -> <workspace>/apps/web
//! apps/web      -> <workspace>/apps/web
//! //            -> <workspace>
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

const ROOT_PREFIX: &str = "//";

/// Errors produced while parsing a target label.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
  #[error("target '{0}' is absolute; use '//' to anchor at the workspace root")]
  Absolute(String),

  #[error("target '{0}' contains an empty path segment")]
  EmptySegment(String),

  #[error("target '{target}' contains disallowed segment '{segment}'")]
  InvalidSegment { target: String, segment: String },

  #[error("target '{0}' uses a ':' label, which is not supported")]
  Label(String),
}

/// A parsed target label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
  segments: Vec<String>,
}

impl Target {
  /// Parse a target label such as `//apps/web`.
  pub fn parse(raw: &str) -> Result<Self, TargetError> {
    let stripped = raw.strip_prefix(ROOT_PREFIX).unwrap_or(raw);

    if stripped.starts_with('/') {
      return Err(TargetError::Absolute(raw.to_string()));
    }
    if stripped.contains(':') {
      return Err(TargetError::Label(raw.to_string()));
    }

    let trimmed = stripped.strip_suffix('/').unwrap_or(stripped);
    if trimmed.is_empty() {
      return Ok(Self { segments: Vec::new() });
    }

    let mut segments = Vec::new();
    for segment in trimmed.split('/') {
      match segment {
        "" => return Err(TargetError::EmptySegment(raw.to_string())),
        "." | ".." => {
          return Err(TargetError::InvalidSegment {
            target: raw.to_string(),
            segment: segment.to_string(),
          });
        }
        _ => segments.push(segment.to_string()),
      }
    }

    Ok(Self { segments })
  }

  /// Path segments below the workspace root.
  pub fn segments(&self) -> &[String] {
    &self.segments
  }

  /// True if the target names the workspace root package itself.
  pub fn is_root(&self) -> bool {
    self.segments.is_empty()
  }

  /// Package directory of this target under `workspace_root`.
  pub fn package_dir(&self, workspace_root: &Path) -> PathBuf {
    let mut dir = workspace_root.to_path_buf();
    for segment in &self.segments {
      dir.push(segment);
    }
    dir
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", ROOT_PREFIX, self.segments.join("/"))
  }
}
