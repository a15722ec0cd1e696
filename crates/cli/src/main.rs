mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zel_lib::consts::APP_NAME;

use crate::cmd::cmd_build;
use crate::output::OutputFormat;

/// zel - Bazel-like target runner for JavaScript and TypeScript packages
#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build every job declared by a target's zel.lua
  Build {
    /// Target package, e.g. //apps/web
    target: String,

    /// Workspace root (default: $ZEL_WORKSPACE, else nearest ZEL_WORKSPACE marker, else cwd)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Shell command used as the bundler (default: $ZEL_BUNDLER_CMD, else the copy bundler)
    #[arg(long)]
    bundler_cmd: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Build {
      target,
      workspace,
      bundler_cmd,
      output,
    } => cmd_build(
      &target,
      workspace.as_deref(),
      bundler_cmd.as_deref(),
      output,
      cli.verbose,
    ),
  }
}
