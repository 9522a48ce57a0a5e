//! Implementation of the `uepack version` subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Subcommand};

use uepack_lib::project::Project;
use uepack_lib::version::{BumpOptions, ReleaseType, bump_project};

use crate::output;

#[derive(Debug, Subcommand)]
pub enum VersionCommand {
  /// Bump the project version in the config files
  Up(UpArgs),
}

#[derive(Debug, Args)]
pub struct UpArgs {
  /// Release type (major, premajor, minor, preminor, patch, prepatch, prerelease)
  pub release: String,

  /// Also bump the Android display version and store version
  #[arg(long)]
  pub android: bool,

  /// Also bump the iOS version info
  #[arg(long)]
  pub ios: bool,

  /// Print the changes as JSON
  #[arg(long)]
  pub json: bool,

  /// Run from this directory instead of the current one
  #[arg(long)]
  pub cwd: Option<PathBuf>,
}

/// Execute a version subcommand.
pub fn cmd_version(command: &VersionCommand) -> Result<()> {
  match command {
    VersionCommand::Up(args) => cmd_version_up(args),
  }
}

fn cmd_version_up(args: &UpArgs) -> Result<()> {
  if let Some(cwd) = &args.cwd {
    std::env::set_current_dir(cwd)
      .with_context(|| format!("Failed to change directory to {}", cwd.display()))?;
  }

  let release: ReleaseType = args.release.parse().map_err(|e: String| anyhow!(e))?;

  // The bump only makes sense inside a project; fail early when invoked
  // elsewhere.
  let project = Project::locate(Path::new("."))?;

  let options = BumpOptions {
    android: args.android,
    ios: args.ios,
  };
  let changes = bump_project(&project.dir, release, &options)?;

  if args.json {
    return output::print_json(&changes);
  }

  output::print_info(&format!("Version up ({})", release.as_str()));
  for change in &changes {
    output::print_stat(
      &format!("{} {}", change.file, change.key),
      &format!("{} -> {}", change.old, change.new),
    );
  }
  output::print_success("Version updated");

  Ok(())
}
