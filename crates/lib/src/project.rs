//! Project discovery and per-invocation context.
//!
//! The `.uproject` descriptor identifies the project root; everything else
//! a packaging run needs (names, version, output directory) is derived
//! once into a read-only `ProjectContext`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::config::{
  ANDROID_SETTINGS_SECTION, ConfigError, ConfigFile, ConfigValue, GAME_SETTINGS_SECTION,
};
use crate::request::BuildRequest;
use crate::util::{find_files, newest_file};

/// File extension of the project descriptor.
pub const PROJECT_EXTENSION: &str = "uproject";

/// Errors that can occur locating a project or deriving its context.
#[derive(Debug, Error)]
pub enum ProjectError {
  /// No descriptor file in the search root.
  #[error("no .{PROJECT_EXTENSION} file found in {}", dir.display())]
  NotFound { dir: PathBuf },

  #[error("invalid search pattern: {0}")]
  Pattern(#[from] glob::PatternError),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// A located project descriptor.
#[derive(Debug, Clone)]
pub struct Project {
  pub file: PathBuf,
  pub dir: PathBuf,
  pub base_name: String,
}

/// Everything derived once per invocation. Read-only after derivation.
#[derive(Debug, Clone)]
pub struct ProjectContext {
  pub project_file: PathBuf,
  pub project_dir: PathBuf,
  pub base_name: String,
  pub project_name: String,
  /// Android package identity; only read for flavored builds.
  pub package_name: String,
  pub version: String,
  pub output_dir: PathBuf,
}

impl Project {
  /// Locate the single project descriptor under `root`.
  ///
  /// Zero matches is fatal. Multiple matches resolve to the most recently
  /// modified descriptor with a warning.
  pub fn locate(root: &Path) -> Result<Self, ProjectError> {
    // The root may itself contain glob metacharacters; match it literally.
    let dir = glob::Pattern::escape(&root.to_string_lossy());
    let matches = find_files(&format!("{dir}/*.{PROJECT_EXTENSION}"))?;

    if matches.len() > 1 {
      warn!(
        count = matches.len(),
        dir = %root.display(),
        "multiple project descriptors found; using the most recent"
      );
    }

    let Some(found) = newest_file(matches) else {
      return Err(ProjectError::NotFound {
        dir: root.to_path_buf(),
      });
    };

    let file = dunce::canonicalize(&found)?;
    let dir = file
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_else(|| PathBuf::from("."));
    let base_name = file
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .unwrap_or_default();

    Ok(Self { file, dir, base_name })
  }

  /// Derive the full invocation context for `request`.
  pub fn context(
    &self,
    request: &BuildRequest,
    output_override: Option<&Path>,
  ) -> Result<ProjectContext, ProjectError> {
    let game = ConfigValue::load(&self.dir, ConfigFile::Game)?;
    let engine = ConfigValue::load(&self.dir, ConfigFile::Engine)?;

    let project_name = game.get(GAME_SETTINGS_SECTION, "ProjectName")?;

    // Only flavored builds emit package-identity overrides, so only they
    // require the Android package name to be configured.
    let package_name = if request.flavor_override().is_some() {
      engine.get(ANDROID_SETTINGS_SECTION, "PackageName")?
    } else {
      String::new()
    };

    let version = engine
      .get(ANDROID_SETTINGS_SECTION, "VersionDisplayName")
      .or_else(|_| game.get(GAME_SETTINGS_SECTION, "ProjectVersion"))?;

    let output_dir = match output_override {
      Some(dir) => dir.to_path_buf(),
      None => self.dir.join("Packaged").join(output_leaf(request)),
    };

    Ok(ProjectContext {
      project_file: self.file.clone(),
      project_dir: self.dir.clone(),
      base_name: self.base_name.clone(),
      project_name,
      package_name,
      version,
      output_dir,
    })
  }
}

/// Output directory leaf: platform, type, config, and flavor concatenated.
fn output_leaf(request: &BuildRequest) -> String {
  let mut leaf = format!("{}{}{}", request.platform, request.run_type, request.config);

  if let Some(flavor) = &request.flavor {
    leaf.push_str(flavor);
  }

  leaf
}
