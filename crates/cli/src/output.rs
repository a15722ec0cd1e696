//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output including colored status
//! messages, duration formatting, and the console job observer.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use zel_lib::events::{JobEvent, JobObserver};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Renders job events to the terminal.
///
/// Artifact contents are only echoed in verbose mode.
pub struct ConsoleObserver {
  verbose: bool,
}

impl ConsoleObserver {
  pub fn new(verbose: bool) -> Self {
    Self { verbose }
  }
}

impl JobObserver for ConsoleObserver {
  fn on_event(&self, event: &JobEvent) {
    match event {
      JobEvent::Found { export, job } => print_info(&format!("Found job {} (export {})", job, export)),
      JobEvent::Started { job } => print_info(&format!("Building {}", job)),
      JobEvent::Resolved { config, .. } => {
        if self.verbose {
          print_stat("root", &config.root.display().to_string());
          print_stat("outdir", &config.outdir.display().to_string());
          for entry in &config.entrypoints {
            print_stat("entrypoint", &entry.display().to_string());
          }
        }
      }
      JobEvent::BuildFailed { job, logs } => {
        print_error(&format!("Build failed: {}", job));
        for log in logs {
          eprintln!("    {}", log);
        }
      }
      JobEvent::ArtifactWritten { path, bytes, echo, .. } => {
        println!(
          "  {} {} ({} bytes)",
          symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.dimmed()),
          path.display(),
          bytes
        );
        if self.verbose {
          for line in echo.lines() {
            println!("      {}", line.if_supports_color(Stream::Stdout, |s| s.dimmed()));
          }
        }
      }
      JobEvent::Finished { job, artifacts } => {
        print_success(&format!("Built {} ({} artifact(s))", job, artifacts))
      }
    }
  }
}
