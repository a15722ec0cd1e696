//! End-to-end target builds.

use std::fs;

use zel_lib::events::JobEvent;
use zel_lib::runner::JobStatus;

use super::common::Workspace;

#[tokio::test]
async fn builds_and_materializes_artifacts() {
  let ws = Workspace::new();
  ws.write_file("apps/web/src/index.ts", "export const hello = 'world';");
  ws.write_file("apps/web/src/empty.ts", "");
  ws.write_file(
    "apps/web/zel.lua",
    r#"
      web = zel.app("web", {
        entrypoints = { "src/index.ts", "src/empty.ts" },
        outdir = "dist",
      })
    "#,
  );

  let (result, events) = ws.build("//apps/web").await;
  let report = result.unwrap();
  let pkg = ws.package("apps/web");

  assert!(report.is_success());
  assert_eq!(
    fs::read_to_string(pkg.join("dist").join("index.ts")).unwrap(),
    "export const hello = 'world';"
  );
  assert_eq!(fs::read_to_string(pkg.join("dist").join("empty.ts")).unwrap(), "");

  let echoes: Vec<_> = events
    .iter()
    .filter_map(|e| match e {
      JobEvent::ArtifactWritten { path, echo, .. } => Some((path.clone(), echo.clone())),
      _ => None,
    })
    .collect();
  assert_eq!(
    echoes,
    vec![
      (pkg.join("dist").join("index.ts"), "export const hello = 'world';".to_string()),
      (pkg.join("dist").join("empty.ts"), "<EMPTY>".to_string()),
    ]
  );
}

#[tokio::test]
async fn event_sequence_for_one_job() {
  let ws = Workspace::new();
  ws.write_file("pkg/a.ts", "a");
  ws.write_file("pkg/zel.lua", r#"app = zel.app("app", { entrypoints = { "a.ts" }, outdir = "dist" })"#);

  let (result, events) = ws.build("//pkg").await;
  result.unwrap();

  let kinds: Vec<_> = events
    .iter()
    .map(|e| match e {
      JobEvent::Found { .. } => "found",
      JobEvent::Started { .. } => "started",
      JobEvent::Resolved { .. } => "resolved",
      JobEvent::BuildFailed { .. } => "failed",
      JobEvent::ArtifactWritten { .. } => "written",
      JobEvent::Finished { .. } => "finished",
    })
    .collect();
  assert_eq!(kinds, ["found", "started", "resolved", "written", "finished"]);
  assert!(events.iter().all(|e| e.job() == "app"));
}

#[tokio::test]
async fn bundler_failure_writes_nothing_and_continues() {
  let ws = Workspace::new();
  ws.write_file("pkg/ok.ts", "ok");
  ws.write_file(
    "pkg/zel.lua",
    r#"
      broken = zel.app("broken", { entrypoints = { "missing.ts" }, outdir = "broken-dist" })
      ok = zel.app("ok", { entrypoints = { "ok.ts" }, outdir = "dist" })
    "#,
  );

  let (result, events) = ws.build("//pkg").await;
  let report = result.unwrap();
  let pkg = ws.package("pkg");

  assert!(!report.is_success());
  assert!(!pkg.join("broken-dist").exists());
  assert!(pkg.join("dist").join("ok.ts").exists());

  assert_eq!(report.jobs[0].job, "broken");
  assert!(matches!(&report.jobs[0].status, JobStatus::Failed { diagnostics } if diagnostics.len() == 1));
  assert!(report.jobs[1].is_success());
  assert!(events.iter().any(|e| matches!(e, JobEvent::BuildFailed { job, .. } if job == "broken")));
}

#[tokio::test]
async fn returned_table_exports_are_built() {
  let ws = Workspace::new();
  ws.write_file("pkg/a.ts", "a");
  ws.write_file("pkg/b.ts", "b");
  ws.write_file(
    "pkg/zel.lua",
    r#"
      return {
        zel.app("first", { entrypoints = { "a.ts" }, outdir = "out/a" }),
        named = zel.app("second", { entrypoints = { "b.ts" }, outdir = "out/b" }),
      }
    "#,
  );

  let (result, _) = ws.build("pkg").await;
  let report = result.unwrap();

  let exports: Vec<_> = report.jobs.iter().map(|j| (j.export.as_str(), j.job.as_str())).collect();
  assert_eq!(exports, [("1", "first"), ("named", "second")]);
  assert!(ws.package("pkg").join("out").join("b").join("b.ts").exists());
}

#[tokio::test]
async fn shared_config_via_require_and_path_helpers() {
  let ws = Workspace::new();
  ws.write_file("pkg/src/main.ts", "main");
  ws.write_file("pkg/defaults.lua", r#"return { outdir = "dist" }"#);
  ws.write_file(
    "pkg/zel.lua",
    r#"
      local defaults = require("defaults")
      main = zel.app("main", {
        entrypoints = { zel.path.join("src", "main.ts") },
        outdir = defaults.outdir,
      })
    "#,
  );

  let (result, _) = ws.build("//pkg").await;
  result.unwrap();
  assert!(ws.package("pkg").join("dist").join("main.ts").exists());
}

#[tokio::test]
async fn root_target_builds_workspace_module() {
  let ws = Workspace::new();
  ws.write_file("a.ts", "a");
  ws.write_file("zel.lua", r#"root = zel.app({ entrypoints = { "a.ts" }, outdir = "dist" })"#);

  let (result, _) = ws.build("//").await;
  let report = result.unwrap();

  assert_eq!(report.target, "//");
  assert!(report.jobs[0].job.starts_with("job-"));
  assert!(ws.root().join("dist").join("a.ts").exists());
}

#[tokio::test]
async fn leading_slash_paths_resolve_under_the_package() {
  let ws = Workspace::new();
  ws.write_file("pkg/src/a.ts", "a");
  ws.write_file(
    "pkg/zel.lua",
    r#"app = zel.app("app", { entrypoints = { "/src/a.ts" }, outdir = "/dist" })"#,
  );

  let (result, _) = ws.build("//pkg").await;
  let report = result.unwrap();

  assert!(report.is_success());
  assert_eq!(
    report.jobs[0].status,
    JobStatus::Succeeded {
      artifacts: vec![ws.package("pkg").join("dist").join("a.ts")]
    }
  );
  assert!(ws.package("pkg").join("dist").join("a.ts").exists());
}

#[tokio::test]
async fn unreadable_entrypoint_fails_only_its_job() {
  let ws = Workspace::new();
  ws.write_file("pkg/srcdir/inner.ts", "inner");
  ws.write_file("pkg/b.ts", "b");
  ws.write_file(
    "pkg/zel.lua",
    r#"
      first = zel.app("first", { entrypoints = { "srcdir" }, outdir = "d1" })
      second = zel.app("second", { entrypoints = { "b.ts" }, outdir = "d2" })
    "#,
  );

  let (result, _) = ws.build("//pkg").await;
  let report = result.unwrap();
  let pkg = ws.package("pkg");

  assert!(matches!(&report.jobs[0].status, JobStatus::Failed { diagnostics } if diagnostics.len() == 1));
  assert!(!pkg.join("d1").exists());
  assert!(report.jobs[1].is_success());
  assert!(pkg.join("d2").join("b.ts").exists());
}

#[tokio::test]
async fn job_exported_twice_runs_once() {
  let ws = Workspace::new();
  ws.write_file("pkg/a.ts", "a");
  ws.write_file(
    "pkg/zel.lua",
    r#"
      web = zel.app("web", { entrypoints = { "a.ts" }, outdir = "dist" })
      return { web = web, web }
    "#,
  );

  let (result, events) = ws.build("//pkg").await;
  let report = result.unwrap();

  assert_eq!(report.jobs.len(), 1);
  assert_eq!(report.jobs[0].export, "web");
  let started = events.iter().filter(|e| matches!(e, JobEvent::Started { .. })).count();
  assert_eq!(started, 1);
}
