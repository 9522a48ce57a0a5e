//! Artifact resolution after a successful packaging run.
//!
//! The external tool archives its output under the computed output
//! directory; this module finds the produced file per extension and moves
//! or copies it to a versioned destination name.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::request::BuildConfig;
use crate::util::{find_files, newest_file};

/// Errors that can occur resolving one artifact extension.
#[derive(Debug, Error)]
pub enum ArtifactError {
  /// The tool reported success but produced nothing with this extension.
  #[error("no .{extension} artifact found in {}", dir.display())]
  NotFound { extension: String, dir: PathBuf },

  #[error("invalid search pattern: {0}")]
  Pattern(#[from] glob::PatternError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// A discovered artifact and its versioned destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
  pub source: PathBuf,
  pub destination: PathBuf,
}

/// Compose the versioned destination file name.
pub fn artifact_file_name(
  base_name: &str,
  config: BuildConfig,
  flavor: Option<&str>,
  version: &str,
  extension: &str,
) -> String {
  let mut parts = vec![base_name.to_string(), config.as_str().to_string()];

  if let Some(flavor) = flavor {
    parts.push(flavor.to_string());
  }

  parts.push(version.to_string());

  format!("{}.{}", parts.join("-"), extension)
}

/// Resolve a single extension: find the produced file, drop any stale
/// destination, and copy or move it into place.
///
/// Zero matches fails before any filesystem mutation. Multiple matches
/// resolve to the most recently modified file with a warning.
pub fn resolve_artifact(
  output_dir: &Path,
  base_name: &str,
  extension: &str,
  destination_name: &str,
  copy: bool,
) -> Result<Artifact, ArtifactError> {
  // Directory and base name may contain glob metacharacters; only the
  // extension wildcard is meant to expand.
  let dir = glob::Pattern::escape(&output_dir.to_string_lossy());
  let base = glob::Pattern::escape(base_name);
  let matches = find_files(&format!("{dir}/{base}*.{extension}"))?;

  if matches.len() > 1 {
    warn!(
      count = matches.len(),
      extension, "multiple artifacts found; using the most recent"
    );
  }

  let Some(source) = newest_file(matches) else {
    return Err(ArtifactError::NotFound {
      extension: extension.to_string(),
      dir: output_dir.to_path_buf(),
    });
  };

  let destination = output_dir.join(destination_name);

  // Already in place from an earlier run.
  if source == destination {
    return Ok(Artifact {
      source: source.clone(),
      destination: source,
    });
  }

  if destination.exists() {
    fs::remove_file(&destination)?;
  }

  if copy {
    fs::copy(&source, &destination)?;
  } else {
    fs::rename(&source, &destination)?;
  }

  info!(
    source = %source.display(),
    destination = %destination.display(),
    "artifact resolved"
  );

  Ok(Artifact { source, destination })
}

/// Resolve every requested extension independently.
///
/// A failed extension never aborts its siblings; each result is returned
/// alongside its extension for the caller to report.
pub fn resolve_artifacts(
  output_dir: &Path,
  base_name: &str,
  config: BuildConfig,
  flavor: Option<&str>,
  version: &str,
  extensions: &[&str],
  copy: bool,
) -> Vec<(String, Result<Artifact, ArtifactError>)> {
  extensions
    .iter()
    .map(|extension| {
      let name = artifact_file_name(base_name, config, flavor, version, extension);
      (
        extension.to_string(),
        resolve_artifact(output_dir, base_name, extension, &name, copy),
      )
    })
    .collect()
}
