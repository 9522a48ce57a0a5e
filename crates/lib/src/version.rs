//! Semantic version bumping for project config files.
//!
//! Mirrors node-semver `inc` semantics for the seven release types,
//! applied to the version fields the engine keeps in DefaultGame.ini and
//! DefaultEngine.ini.

use std::path::Path;
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease, Version};
use serde::Serialize;
use thiserror::Error;

use crate::config::{
  ANDROID_SETTINGS_SECTION, ConfigError, ConfigFile, ConfigValue, GAME_SETTINGS_SECTION,
  IOS_SETTINGS_SECTION,
};

/// Errors that can occur bumping project versions.
#[derive(Debug, Error)]
pub enum VersionError {
  /// The configured value is not a semantic version.
  #[error("cannot increment version {value:?}: {source}")]
  Invalid { value: String, source: semver::Error },

  #[error(transparent)]
  Config(#[from] ConfigError),
}

/// How to bump a version field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
  Major,
  Premajor,
  Minor,
  Preminor,
  Patch,
  Prepatch,
  Prerelease,
}

impl ReleaseType {
  pub fn as_str(&self) -> &'static str {
    match self {
      ReleaseType::Major => "major",
      ReleaseType::Premajor => "premajor",
      ReleaseType::Minor => "minor",
      ReleaseType::Preminor => "preminor",
      ReleaseType::Patch => "patch",
      ReleaseType::Prepatch => "prepatch",
      ReleaseType::Prerelease => "prerelease",
    }
  }
}

impl FromStr for ReleaseType {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "major" => Ok(ReleaseType::Major),
      "premajor" => Ok(ReleaseType::Premajor),
      "minor" => Ok(ReleaseType::Minor),
      "preminor" => Ok(ReleaseType::Preminor),
      "patch" => Ok(ReleaseType::Patch),
      "prepatch" => Ok(ReleaseType::Prepatch),
      "prerelease" => Ok(ReleaseType::Prerelease),
      other => Err(format!("unknown release type: {other}")),
    }
  }
}

/// One mutated version field, for display or JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct FieldChange {
  pub file: String,
  pub section: String,
  pub key: String,
  pub old: String,
  pub new: String,
}

/// Which config files to bump besides the game project version.
#[derive(Debug, Clone, Copy, Default)]
pub struct BumpOptions {
  pub android: bool,
  pub ios: bool,
}

/// Increment `value` according to `release`.
pub fn increment(value: &str, release: ReleaseType) -> Result<String, VersionError> {
  let invalid = |source: semver::Error| VersionError::Invalid {
    value: value.to_string(),
    source,
  };

  let mut version = Version::parse(value.trim()).map_err(invalid)?;

  match release {
    ReleaseType::Major => {
      // A prerelease of the next major (e.g. 2.0.0-rc.1) graduates
      // instead of skipping a major.
      if version.pre.is_empty() || version.minor != 0 || version.patch != 0 {
        version.major += 1;
      }
      version.minor = 0;
      version.patch = 0;
      version.pre = Prerelease::EMPTY;
    }
    ReleaseType::Minor => {
      if version.pre.is_empty() || version.patch != 0 {
        version.minor += 1;
      }
      version.patch = 0;
      version.pre = Prerelease::EMPTY;
    }
    ReleaseType::Patch => {
      if version.pre.is_empty() {
        version.patch += 1;
      }
      version.pre = Prerelease::EMPTY;
    }
    ReleaseType::Premajor => {
      version.major += 1;
      version.minor = 0;
      version.patch = 0;
      version.pre = Prerelease::new("0").map_err(invalid)?;
    }
    ReleaseType::Preminor => {
      version.minor += 1;
      version.patch = 0;
      version.pre = Prerelease::new("0").map_err(invalid)?;
    }
    ReleaseType::Prepatch => {
      version.patch += 1;
      version.pre = Prerelease::new("0").map_err(invalid)?;
    }
    ReleaseType::Prerelease => {
      if version.pre.is_empty() {
        version.patch += 1;
        version.pre = Prerelease::new("0").map_err(invalid)?;
      } else {
        version.pre = Prerelease::new(&bump_prerelease(version.pre.as_str())).map_err(invalid)?;
      }
    }
  }

  version.build = BuildMetadata::EMPTY;

  Ok(version.to_string())
}

/// Bump the last numeric prerelease identifier, or append `.0` when none
/// exists.
fn bump_prerelease(pre: &str) -> String {
  let mut ids: Vec<String> = pre.split('.').map(str::to_string).collect();

  match ids.iter().rposition(|id| id.parse::<u64>().is_ok()) {
    Some(index) => {
      let n: u64 = ids[index].parse().unwrap_or(0);
      ids[index] = (n + 1).to_string();
    }
    None => ids.push("0".to_string()),
  }

  ids.join(".")
}

/// Bump version fields in the project config files.
///
/// Every new value is computed before any file is written, so a failed
/// increment leaves all files untouched. The Engine keys are batched
/// through one held parser and a single rewrite.
pub fn bump_project(
  project_dir: &Path,
  release: ReleaseType,
  options: &BumpOptions,
) -> Result<Vec<FieldChange>, VersionError> {
  let mut changes = Vec::new();

  let mut game = ConfigValue::load(project_dir, ConfigFile::Game)?;
  let old = game.get(GAME_SETTINGS_SECTION, "ProjectVersion")?;
  let new = increment(&old, release)?;
  game.set(GAME_SETTINGS_SECTION, "ProjectVersion", &new);
  changes.push(FieldChange {
    file: ConfigFile::Game.file_name().to_string(),
    section: GAME_SETTINGS_SECTION.to_string(),
    key: "ProjectVersion".to_string(),
    old,
    new,
  });

  let engine = if options.android || options.ios {
    let mut engine = ConfigValue::load(project_dir, ConfigFile::Engine)?;

    if options.android {
      let old = engine.get(ANDROID_SETTINGS_SECTION, "VersionDisplayName")?;
      let new = increment(&old, release)?;
      engine.set(ANDROID_SETTINGS_SECTION, "VersionDisplayName", &new);
      changes.push(FieldChange {
        file: ConfigFile::Engine.file_name().to_string(),
        section: ANDROID_SETTINGS_SECTION.to_string(),
        key: "VersionDisplayName".to_string(),
        old,
        new,
      });

      let old_store = engine.get_i64(ANDROID_SETTINGS_SECTION, "StoreVersion")?;
      let new_store = old_store + 1;
      engine.set(ANDROID_SETTINGS_SECTION, "StoreVersion", &new_store.to_string());
      changes.push(FieldChange {
        file: ConfigFile::Engine.file_name().to_string(),
        section: ANDROID_SETTINGS_SECTION.to_string(),
        key: "StoreVersion".to_string(),
        old: old_store.to_string(),
        new: new_store.to_string(),
      });
    }

    if options.ios {
      let old = engine.get(IOS_SETTINGS_SECTION, "VersionInfo")?;
      let new = increment(&old, release)?;
      engine.set(IOS_SETTINGS_SECTION, "VersionInfo", &new);
      changes.push(FieldChange {
        file: ConfigFile::Engine.file_name().to_string(),
        section: IOS_SETTINGS_SECTION.to_string(),
        key: "VersionInfo".to_string(),
        old,
        new,
      });
    }

    Some(engine)
  } else {
    None
  };

  // All increments succeeded; commit.
  game.write()?;
  if let Some(engine) = engine {
    engine.write()?;
  }

  Ok(changes)
}
