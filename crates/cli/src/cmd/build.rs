//! Implementation of the `uepack build` command.
//!
//! Locates the project, assembles the `BuildCookRun` invocation, runs the
//! engine's automation tool to completion, and collects the produced
//! artifacts under versioned names.

use std::collections::BTreeMap;
use std::iter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use tracing::debug;

use uepack_lib::args::build_cook_run_args;
use uepack_lib::artifact::resolve_artifacts;
use uepack_lib::engine::{engine_root, locate_uat};
use uepack_lib::process::{BUILD_COOK_RUN, RunOptions, run_uat};
use uepack_lib::project::{Project, ProjectContext};
use uepack_lib::request::BuildRequest;

use crate::output;

#[derive(Debug, Args)]
pub struct BuildArgs {
  /// Target platform (android, windows, linux)
  pub platform: String,

  /// Binary type (client, server)
  #[arg(value_name = "TYPE")]
  pub run_type: String,

  /// Build configuration (test, debug, development, shipping)
  pub config: String,

  /// Package flavor; "production" keeps the configured package identity
  pub flavor: Option<String>,

  /// Package flavor (flag form)
  #[arg(long = "flavor", value_name = "FLAVOR", conflicts_with = "flavor")]
  pub flavor_flag: Option<String>,

  /// Run from this directory instead of the current one
  #[arg(long)]
  pub cwd: Option<PathBuf>,

  /// Extra KEY=VALUE variables exposed to the build tool's environment
  #[arg(short, long = "define", value_name = "KEY=VALUE")]
  pub define: Vec<String>,

  /// Archive directory override
  #[arg(long)]
  pub output: Option<PathBuf>,

  /// Copy the produced artifacts to their versioned names (default)
  #[arg(long, overrides_with = "no_copy")]
  pub copy: bool,

  /// Move the produced artifacts instead of copying
  #[arg(long)]
  pub no_copy: bool,

  /// Print the tool invocation instead of running it
  #[arg(long)]
  pub expose: bool,
}

/// Execute the build command.
pub fn cmd_build(args: &BuildArgs, verbose: bool) -> Result<()> {
  if let Some(cwd) = &args.cwd {
    std::env::set_current_dir(cwd)
      .with_context(|| format!("Failed to change directory to {}", cwd.display()))?;
  }

  let request = BuildRequest {
    platform: args.platform.parse().map_err(|e: String| anyhow!(e))?,
    run_type: args.run_type.parse().map_err(|e: String| anyhow!(e))?,
    config: args.config.parse().map_err(|e: String| anyhow!(e))?,
    flavor: args.flavor.clone().or_else(|| args.flavor_flag.clone()),
    defines: parse_defines(&args.define)?,
    verbose,
  };

  let project = Project::locate(Path::new("."))?;
  output::print_info(&format!("Project: {}", project.file.display()));

  let context = project.context(&request, args.output.as_deref())?;

  let uat = locate_uat().context("Unable to find the engine location")?;
  output::print_stat("Engine", &engine_root(&uat).display().to_string());
  output::print_stat("Output", &context.output_dir.display().to_string());

  let tool_args: Vec<String> = iter::once(BUILD_COOK_RUN.to_string())
    .chain(build_cook_run_args(&request, &context))
    .collect();
  debug!(args = ?tool_args, "assembled tool invocation");

  if args.expose {
    println!("{} {}", uat.display(), tool_args.join(" "));
    return Ok(());
  }

  let options = RunOptions {
    verbose,
    env: request.defines.clone(),
  };

  let start = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt
    .block_on(run_uat(&uat, &tool_args, &options, |phase| {
      output::print_info(phase.message());
    }))
    .context("Build failed")?;

  output::print_success(&format!(
    "Build finished in {}",
    output::format_duration(start.elapsed())
  ));

  collect_artifacts(&request, &context, !args.no_copy)
}

/// Rename the produced files to versioned artifact names.
fn collect_artifacts(request: &BuildRequest, context: &ProjectContext, copy: bool) -> Result<()> {
  let extensions = request.platform.artifact_extensions(request.config);

  if extensions.is_empty() {
    output::print_info(&format!("Packaged output: {}", context.output_dir.display()));
    return Ok(());
  }

  // Unlike the override pair, the artifact name carries every flavor,
  // production included.
  let results = resolve_artifacts(
    &context.output_dir,
    &context.base_name,
    request.config,
    request.flavor.as_deref(),
    &context.version,
    &extensions,
    copy,
  );

  let mut resolved = 0;
  for (extension, result) in results {
    match result {
      Ok(artifact) => {
        output::print_success(&format!("Artifact: {}", artifact.destination.display()));
        resolved += 1;
      }
      Err(err) => output::print_warning(&format!("{extension}: {err}")),
    }
  }

  if resolved == 0 {
    bail!("no artifacts were produced");
  }

  Ok(())
}

fn parse_defines(defines: &[String]) -> Result<BTreeMap<String, String>> {
  let mut map = BTreeMap::new();

  for define in defines {
    let Some((key, value)) = define.split_once('=') else {
      bail!("invalid define {define:?}, expected KEY=VALUE");
    };
    map.insert(key.to_string(), value.to_string());
  }

  Ok(map)
}
