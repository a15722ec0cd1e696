//! Path resolution for job configurations.
//!
//! Resolution is a pure rewrite: `root` becomes the base directory and every
//! entry point and the output directory are joined onto it segment by segment.
//! A leading `/` on a declared path is dropped rather than honored, so
//! `"/a.ts"` still lands under the base. `..` and symlinks are left alone.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use super::{JobConfig, ResolvedConfig};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
  #[error("base directory must be absolute: {}", .0.display())]
  RelativeBase(PathBuf),
}

/// Resolve `config` against `base_dir`.
pub fn resolve_config(base_dir: &Path, config: &JobConfig) -> Result<ResolvedConfig, ResolveError> {
  if !base_dir.is_absolute() {
    return Err(ResolveError::RelativeBase(base_dir.to_path_buf()));
  }

  Ok(ResolvedConfig {
    root: base_dir.to_path_buf(),
    entrypoints: config.entrypoints.iter().map(|entry| anchor(base_dir, entry)).collect(),
    outdir: anchor(base_dir, &config.outdir),
    options: config.options.clone(),
  })
}

fn anchor(base_dir: &Path, declared: &str) -> PathBuf {
  // Path::join replaces the base when the joined path has a root.
  let relative = Path::new(declared)
    .components()
    .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
    .collect::<PathBuf>();
  base_dir.join(relative)
}
