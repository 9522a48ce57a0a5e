//! External build tool orchestration.
//!
//! Launches `RunUAT BuildCookRun` and streams its output. Both output
//! streams are drained on the invoking task before the exit status is
//! resolved, so every classified phase event is delivered before the
//! completion outcome.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info};

/// Entry point passed to the UAT script ahead of the assembled arguments.
pub const BUILD_COOK_RUN: &str = "BuildCookRun";

/// Errors that can occur running the build tool.
#[derive(Debug, Error)]
pub enum UatError {
  /// The tool could not be spawned at all.
  #[error("failed to launch {tool}: {source}")]
  Spawn { tool: String, source: std::io::Error },

  /// The tool ran and reported failure. No retry; a nonzero exit means a
  /// genuine build failure.
  #[error("build tool exited with code {code:?}")]
  ToolFailed { code: Option<i32> },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// A recognized progress phase in the tool's output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Build,
  Cook,
  Stage,
  Package,
  PackageApk,
  Archive,
  Done,
}

/// Marker substrings in the stream order of a packaging run. A line
/// matches at most one marker; the first hit wins.
const MARKERS: &[(&str, Phase)] = &[
  ("BUILD COMMAND STARTED", Phase::Build),
  ("COOK COMMAND STARTED", Phase::Cook),
  ("STAGE COMMAND STARTED", Phase::Stage),
  ("PACKAGE COMMAND STARTED", Phase::Package),
  ("Making .apk with Gradle", Phase::PackageApk),
  ("ARCHIVE COMMAND STARTED", Phase::Archive),
  ("BUILD SUCCESSFUL", Phase::Done),
];

impl Phase {
  /// Short human message for the phase.
  pub fn message(&self) -> &'static str {
    match self {
      Phase::Build => "Building...",
      Phase::Cook => "Cooking content...",
      Phase::Stage => "Staging...",
      Phase::Package => "Packaging...",
      Phase::PackageApk => "Packaging APK...",
      Phase::Archive => "Archiving...",
      Phase::Done => "Build successful",
    }
  }

  fn classify(line: &str) -> Option<Phase> {
    MARKERS
      .iter()
      .find(|(marker, _)| line.contains(marker))
      .map(|&(_, phase)| phase)
  }
}

/// Completed run of the external tool.
#[derive(Debug)]
pub struct ProcessOutcome {
  pub exit_code: i32,
  /// Classified phase events, in delivery order. Empty in verbose mode.
  pub phases: Vec<Phase>,
}

/// Options for a tool run.
#[derive(Debug, Default)]
pub struct RunOptions {
  /// Forward raw output instead of classifying phases.
  pub verbose: bool,
  /// Extra variables overlaid on the inherited environment, so the tool's
  /// own config layer can pick them up.
  pub env: BTreeMap<String, String>,
}

/// Run the UAT script to completion.
///
/// `on_phase` fires once per classified stdout line, always before this
/// function returns. Stderr lines are logged at error level regardless of
/// verbosity. No timeout is enforced; packaging builds legitimately run
/// for hours.
pub async fn run_uat(
  uat: &Path,
  args: &[String],
  options: &RunOptions,
  mut on_phase: impl FnMut(Phase),
) -> Result<ProcessOutcome, UatError> {
  info!(tool = %uat.display(), "launching build tool");

  // A run abandoned mid-stream (read error, caller drop) must not leave
  // the tool running.
  let mut child = Command::new(uat)
    .args(args)
    .envs(&options.env)
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true)
    .spawn()
    .map_err(|source| UatError::Spawn {
      tool: uat.display().to_string(),
      source,
    })?;

  let stdout = child
    .stdout
    .take()
    .ok_or_else(|| UatError::Io(std::io::Error::other("stdout not captured")))?;
  let stderr = child
    .stderr
    .take()
    .ok_or_else(|| UatError::Io(std::io::Error::other("stderr not captured")))?;

  let mut out_lines = BufReader::new(stdout).lines();
  let mut err_lines = BufReader::new(stderr).lines();
  let mut out_done = false;
  let mut err_done = false;
  let mut phases = Vec::new();

  // Single-task select keeps phase delivery serialized with completion.
  while !out_done || !err_done {
    tokio::select! {
      line = out_lines.next_line(), if !out_done => match line? {
        Some(line) => {
          if options.verbose {
            info!("{line}");
          } else if let Some(phase) = Phase::classify(&line) {
            debug!(marker = %line, "phase marker");
            phases.push(phase);
            on_phase(phase);
          }
        }
        None => out_done = true,
      },
      line = err_lines.next_line(), if !err_done => match line? {
        Some(line) => error!("{line}"),
        None => err_done = true,
      },
    }
  }

  let status = child.wait().await?;

  if !status.success() {
    return Err(UatError::ToolFailed { code: status.code() });
  }

  Ok(ProcessOutcome {
    exit_code: status.code().unwrap_or(0),
    phases,
  })
}
