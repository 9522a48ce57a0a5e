//! uepack - Unreal Engine packaging helper.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use cmd::{BuildArgs, VersionCommand, cmd_build, cmd_version};

/// uepack - package Unreal Engine projects from the command line
#[derive(Parser)]
#[command(name = "uepack")]
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
  /// Package the project for a platform
  Build(BuildArgs),

  /// Manage the project version
  #[command(subcommand)]
  Version(VersionCommand),
}

fn main() {
  let cli = Cli::parse();

  // Verbose builds stream the tool's raw output at info level.
  let default_level = if cli.verbose { "info" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
    )
    .without_time()
    .init();

  if let Err(err) = run(cli) {
    output::print_error(&format!("{err:#}"));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  match &cli.command {
    Commands::Build(args) => cmd_build(args, cli.verbose),
    Commands::Version(command) => cmd_version(command),
  }
}
