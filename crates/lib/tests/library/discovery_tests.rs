//! Job discovery from target modules.

use zel_lib::events::NullObserver;
use zel_lib::runner::{RunError, discover_jobs, package_dir};
use zel_lib::target::Target;

use super::common::Workspace;

fn discover(ws: &Workspace, target: &str) -> Result<Vec<(String, String)>, RunError> {
  let target = Target::parse(target).unwrap();
  let dir = package_dir(ws.root(), &target)?;
  let jobs = discover_jobs(&dir, &target, &NullObserver)?;
  Ok(
    jobs
      .into_iter()
      .map(|(export, job)| (export, job.name().to_string()))
      .collect(),
  )
}

#[test]
fn one_job_among_three_bindings() {
  let ws = Workspace::new();
  ws.write_file(
    "pkg/zel.lua",
    r#"
      version = "1.0.0"
      web = zel.app("web", { entrypoints = { "a.ts" }, outdir = "dist" })
      helpers = { key = "not-a-job" }
    "#,
  );

  let jobs = discover(&ws, "//pkg").unwrap();
  assert_eq!(jobs, vec![("web".to_string(), "web".to_string())]);
}

#[test]
fn module_without_jobs() {
  let ws = Workspace::new();
  ws.write_file("pkg/zel.lua", "local unused = 1");

  assert!(discover(&ws, "//pkg").unwrap().is_empty());
}

#[test]
fn unnamed_jobs_get_non_empty_names() {
  let ws = Workspace::new();
  ws.write_file(
    "pkg/zel.lua",
    r#"
      a = zel.app({ entrypoints = { "a.ts" }, outdir = "dist" })
      b = zel.app({ entrypoints = { "b.ts" }, outdir = "dist" })
    "#,
  );

  let jobs = discover(&ws, "//pkg").unwrap();
  assert_eq!(jobs.len(), 2);
  assert!(jobs.iter().all(|(_, name)| !name.is_empty()));
}

#[test]
fn target_globals_are_visible_to_the_module() {
  let ws = Workspace::new();
  ws.write_file(
    "apps/web/zel.lua",
    r#"
      assert(zel.target == "//apps/web", "unexpected target " .. zel.target)
      assert(zel.path.basename(zel.dir) == "web", "unexpected dir " .. zel.dir)
      web = zel.app("web", { entrypoints = { "a.ts" }, outdir = "dist" })
    "#,
  );

  assert_eq!(discover(&ws, "apps/web").unwrap().len(), 1);
}

#[test]
fn package_must_be_a_directory() {
  let ws = Workspace::new();
  ws.write_file("file", "not a directory");

  let err = discover(&ws, "//file").unwrap_err();
  assert!(matches!(err, RunError::PackageNotFound { .. }));
}
