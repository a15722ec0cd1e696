//! Shared helpers for library integration tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;
use zel_lib::bundler::CopyBundler;
use zel_lib::events::{JobEvent, JobObserver};
use zel_lib::fs::LocalFs;
use zel_lib::job::JobContext;
use zel_lib::runner::{RunError, TargetReport, build_target};
use zel_lib::target::Target;

/// Temporary workspace with helpers for laying out packages.
pub struct Workspace {
  pub temp: TempDir,
}

impl Workspace {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  /// Write a file relative to the workspace root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Canonical path of a package directory.
  pub fn package(&self, relative_path: &str) -> PathBuf {
    dunce::canonicalize(self.root().join(relative_path)).unwrap()
  }

  /// Build `target` with the copy bundler, collecting events.
  pub async fn build(&self, target: &str) -> (Result<TargetReport, RunError>, Vec<JobEvent>) {
    let observer = CollectingObserver::default();
    let bundler = CopyBundler::new();
    let ctx = JobContext::new(&bundler, &LocalFs, &observer);

    let target = Target::parse(target).unwrap();
    let result = build_target(self.root(), &target, &ctx).await;
    (result, observer.into_events())
  }
}

#[derive(Default)]
pub struct CollectingObserver {
  events: Mutex<Vec<JobEvent>>,
}

impl CollectingObserver {
  pub fn into_events(self) -> Vec<JobEvent> {
    self.events.into_inner().unwrap()
  }
}

impl JobObserver for CollectingObserver {
  fn on_event(&self, event: &JobEvent) {
    self.events.lock().unwrap().push(event.clone());
  }
}
