//! Build command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

fn with_sources(env: &TestEnv, package: &str) {
  env.write_file(&format!("{}/src/index.ts", package), "export const hello = 'world';\n");
  env.write_file(&format!("{}/src/empty.ts", package), "");
}

#[test]
fn build_writes_artifacts() {
  let env = TestEnv::from_fixture("single_app.lua", "apps/web");
  with_sources(&env, "apps/web");

  env
    .zel_cmd()
    .args(["build", "//apps/web"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Built web (2 artifact(s))"))
    .stdout(predicate::str::contains("Built //apps/web"));

  assert_eq!(
    std::fs::read_to_string(env.path("apps/web/dist/index.ts")).unwrap(),
    "export const hello = 'world';\n"
  );
  assert_eq!(std::fs::read_to_string(env.path("apps/web/dist/empty.ts")).unwrap(), "");
}

#[test]
fn verbose_build_echoes_artifact_contents() {
  let env = TestEnv::from_fixture("single_app.lua", "apps/web");
  with_sources(&env, "apps/web");

  env
    .zel_cmd()
    .args(["build", "-v", "//apps/web"])
    .assert()
    .success()
    .stdout(predicate::str::contains("export const hello = 'world';"))
    .stdout(predicate::str::contains("<EMPTY>"));
}

#[test]
fn target_without_leading_slashes() {
  let env = TestEnv::from_fixture("single_app.lua", "apps/web");
  with_sources(&env, "apps/web");

  env.zel_cmd().args(["build", "apps/web"]).assert().success();
  assert!(env.path("apps/web/dist/index.ts").exists());
}

#[test]
fn failing_job_does_not_stop_later_jobs() {
  let env = TestEnv::from_fixture("failing_then_ok.lua", "pkg");
  env.write_file("pkg/src/index.ts", "ok");

  env
    .zel_cmd()
    .args(["build", "//pkg"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Build failed: broken"))
    .stderr(predicate::str::contains("could not resolve entry point"))
    .stderr(predicate::str::contains("1 of 2 job(s) failed"));

  assert!(!env.path("pkg/broken-dist").exists());
  assert!(env.path("pkg/dist/index.ts").exists());
}

#[test]
fn module_without_jobs_succeeds() {
  let env = TestEnv::from_fixture("no_jobs.lua", "pkg");

  env
    .zel_cmd()
    .args(["build", "//pkg"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Jobs: 0"));
}

#[test]
fn module_can_require_sibling_files() {
  let env = TestEnv::from_fixture("shared_defaults.lua", "pkg");
  env.write_file("pkg/defaults.lua", "return { outdir = \"out\" }\n");
  env.write_file("pkg/src/index.ts", "main");

  env.zel_cmd().args(["build", "//pkg"]).assert().success();
  assert!(env.path("pkg/out/index.ts").exists());
}

#[test]
fn missing_module_fails() {
  let env = TestEnv::empty();
  env.write_file("pkg/README.md", "no module here");

  env
    .zel_cmd()
    .args(["build", "//pkg"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no zel.lua in package"));
}

#[test]
fn lua_error_fails() {
  let env = TestEnv::empty();
  env.write_file("pkg/zel.lua", "error('boom')");

  env
    .zel_cmd()
    .args(["build", "//pkg"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("boom"));
}

#[test]
fn json_output_reports_each_job() {
  let env = TestEnv::from_fixture("failing_then_ok.lua", "pkg");
  env.write_file("pkg/src/index.ts", "ok");

  let output = env
    .zel_cmd()
    .args(["build", "//pkg", "-o", "json"])
    .output()
    .unwrap();
  assert!(!output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["target"], "//pkg");
  assert_eq!(report["jobs"][0]["job"], "broken");
  assert_eq!(report["jobs"][0]["status"], "failed");
  assert_eq!(report["jobs"][1]["job"], "ok");
  assert_eq!(report["jobs"][1]["status"], "succeeded");
  assert_eq!(report["jobs"][1]["artifacts"].as_array().unwrap().len(), 1);
}

#[cfg(unix)]
#[test]
fn command_bundler_receives_entry_points() {
  let env = TestEnv::from_fixture("single_app.lua", "apps/web");
  with_sources(&env, "apps/web");

  env
    .zel_cmd()
    .args(["build", "//apps/web", "--bundler-cmd"])
    .arg(r#"for f in "$@"; do cat "$f" >> "$ZEL_OUTDIR/bundle.js"; done; echo "$ZEL_OPTIONS" > "$ZEL_OUTDIR/options.json""#)
    .assert()
    .success();

  assert_eq!(
    std::fs::read_to_string(env.path("apps/web/dist/bundle.js")).unwrap(),
    "export const hello = 'world';\n"
  );
  let options: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(env.path("apps/web/dist/options.json")).unwrap()).unwrap();
  assert_eq!(options["minify"], true);
}

#[cfg(unix)]
#[test]
fn command_bundler_failure_is_reported() {
  let env = TestEnv::from_fixture("single_app.lua", "apps/web");
  with_sources(&env, "apps/web");

  env
    .zel_cmd()
    .env("ZEL_BUNDLER_CMD", "echo 'syntax error in index.ts' >&2; exit 3")
    .args(["build", "//apps/web"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("error: syntax error in index.ts"))
    .stderr(predicate::str::contains("exited with code 3"));

  assert!(!env.path("apps/web/dist").exists());
}
