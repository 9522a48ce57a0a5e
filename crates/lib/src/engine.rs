//! Engine installation discovery.
//!
//! Resolution order: the `UEPACK_ENGINE_ROOT` environment variable, the
//! well-known install roots for each host OS, then a PATH lookup.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::util::find_files;

/// Environment variable pointing directly at an engine install root.
pub const ENGINE_ROOT_ENV: &str = "UEPACK_ENGINE_ROOT";

/// Install roots probed for an engine, in order.
const KNOWN_ROOTS: &[&str] = &[
  "C:\\Program Files\\Epic Games",
  "/Users/Shared/UnrealEngine",
  "/opt/unreal-engine",
];

#[cfg(windows)]
const UAT_SCRIPT: &str = "RunUAT.bat";
#[cfg(not(windows))]
const UAT_SCRIPT: &str = "RunUAT.sh";

/// Errors that can occur locating the build tool.
#[derive(Debug, Error)]
pub enum EngineError {
  /// `UEPACK_ENGINE_ROOT` is set but the script is not beneath it.
  #[error("no {UAT_SCRIPT} under {ENGINE_ROOT_ENV} root {}", root.display())]
  BadOverride { root: PathBuf },

  /// Neither the known roots nor PATH resolved an installation.
  #[error("unable to find an Unreal Engine installation")]
  NotFound,

  #[error("invalid search pattern: {0}")]
  Pattern(#[from] glob::PatternError),
}

/// The fixed UAT script location beneath an engine root.
pub fn uat_script(engine_root: &Path) -> PathBuf {
  engine_root
    .join("Engine")
    .join("Build")
    .join("BatchFiles")
    .join(UAT_SCRIPT)
}

/// Engine root for a discovered UAT script: the script path minus the four
/// trailing components `Engine/Build/BatchFiles/RunUAT.*`.
pub fn engine_root(uat_path: &Path) -> PathBuf {
  let mut root = uat_path.to_path_buf();

  for _ in 0..4 {
    root.pop();
  }

  root
}

/// Locate the UAT entry-point script.
pub fn locate_uat() -> Result<PathBuf, EngineError> {
  if let Ok(root) = env::var(ENGINE_ROOT_ENV) {
    let root = PathBuf::from(root);
    let script = uat_script(&root);

    if script.is_file() {
      return Ok(script);
    }

    return Err(EngineError::BadOverride { root });
  }

  for root in KNOWN_ROOTS {
    let root = Path::new(root);
    if !root.is_dir() {
      continue;
    }

    let pattern = root
      .join("**")
      .join("Engine")
      .join("Build")
      .join("BatchFiles")
      .join(UAT_SCRIPT);

    if let Some(script) = find_files(&pattern.to_string_lossy())?.into_iter().next() {
      debug!(script = %script.display(), "engine found under known root");
      return Ok(script);
    }
  }

  if let Ok(script) = which::which(UAT_SCRIPT) {
    debug!(script = %script.display(), "engine found on PATH");
    return Ok(script);
  }

  Err(EngineError::NotFound)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use tempfile::TempDir;

  #[test]
  fn engine_root_drops_script_components() {
    let uat = Path::new("/opt/unreal-engine/UE_5.4/Engine/Build/BatchFiles/RunUAT.sh");
    assert_eq!(engine_root(uat), Path::new("/opt/unreal-engine/UE_5.4"));
  }

  #[test]
  fn uat_script_joins_fixed_subpath() {
    let script = uat_script(Path::new("/engines/UE_5.4"));
    assert!(script.starts_with("/engines/UE_5.4/Engine/Build/BatchFiles"));
  }

  #[test]
  #[serial]
  fn locate_uat_honors_override() {
    let temp = TempDir::new().unwrap();
    let script = uat_script(temp.path());
    std::fs::create_dir_all(script.parent().unwrap()).unwrap();
    std::fs::write(&script, "#!/bin/sh\n").unwrap();

    temp_env::with_var(ENGINE_ROOT_ENV, Some(temp.path()), || {
      assert_eq!(locate_uat().unwrap(), script);
    });
  }

  #[test]
  #[serial]
  fn locate_uat_rejects_bad_override() {
    let temp = TempDir::new().unwrap();

    temp_env::with_var(ENGINE_ROOT_ENV, Some(temp.path()), || {
      assert!(matches!(locate_uat(), Err(EngineError::BadOverride { .. })));
    });
  }
}
