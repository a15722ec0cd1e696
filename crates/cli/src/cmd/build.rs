//! Implementation of the `zel build` command.
//!
//! Resolves the workspace and bundler, builds every job exported by the
//! target's module, and reports the outcome.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use zel_lib::config::Settings;
use zel_lib::events::{JobObserver, TracingObserver};
use zel_lib::fs::LocalFs;
use zel_lib::job::JobContext;
use zel_lib::runner::{JobStatus, build_target};
use zel_lib::target::Target;

use crate::output::{ConsoleObserver, OutputFormat, format_duration, print_error, print_json, print_stat, print_success};

/// Execute the build command.
///
/// Jobs run in declaration order. A failing job does not stop the ones after
/// it, but the command exits non-zero once all of them have run.
pub fn cmd_build(
  target: &str,
  workspace: Option<&Path>,
  bundler_cmd: Option<&str>,
  output: OutputFormat,
  verbose: bool,
) -> Result<()> {
  let target = Target::parse(target).with_context(|| format!("Invalid target '{}'", target))?;
  let settings = Settings::resolve(workspace, bundler_cmd).context("Failed to resolve settings")?;
  info!(
    workspace = %settings.workspace_root.display(),
    bundler = %settings.bundler.describe(),
    "starting build"
  );

  let bundler = settings.bundler.clone().into_bundler();
  let fs = LocalFs;
  let observer: Box<dyn JobObserver> = if output.is_json() {
    Box::new(TracingObserver)
  } else {
    Box::new(ConsoleObserver::new(verbose))
  };
  let ctx = JobContext::new(bundler.as_ref(), &fs, observer.as_ref());

  let start = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt
    .block_on(build_target(&settings.workspace_root, &target, &ctx))
    .with_context(|| format!("Build of {} failed", target))?;
  let elapsed = start.elapsed();

  let failed = report.failed().count();

  if output.is_json() {
    print_json(&report)?;
  } else {
    println!();
    if failed == 0 {
      print_success(&format!("Built {}", report.target));
    } else {
      print_error(&format!("Built {} with failures", report.target));
    }
    print_stat("Package", &report.package_dir.display().to_string());
    print_stat("Bundler", &settings.bundler.describe());
    print_stat("Jobs", &report.jobs.len().to_string());
    for outcome in &report.jobs {
      let status = match &outcome.status {
        JobStatus::Succeeded { artifacts } => format!("ok, {} artifact(s)", artifacts.len()),
        JobStatus::Failed { diagnostics } => format!("failed, {} diagnostic(s)", diagnostics.len()),
      };
      print_stat(&format!("  {}", outcome.job), &status);
    }
    print_stat("Time", &format_duration(elapsed));
  }

  if failed > 0 {
    return Err(anyhow!("{} of {} job(s) failed", failed, report.jobs.len()));
  }

  Ok(())
}
