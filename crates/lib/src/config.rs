//! Unreal INI configuration access.
//!
//! Reads and mutates keys in the two well-known project config files,
//! `Config/DefaultEngine.ini` and `Config/DefaultGame.ini`. Any single-key
//! change rewrites the whole file; callers that need several keys updated
//! together hold one `ConfigValue` across the `set` calls and `write`
//! once.

use std::fmt;
use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use thiserror::Error;

/// Section holding general project identity in DefaultGame.ini.
pub const GAME_SETTINGS_SECTION: &str = "/Script/EngineSettings.GeneralProjectSettings";

/// Section holding Android packaging settings in DefaultEngine.ini.
pub const ANDROID_SETTINGS_SECTION: &str = "/Script/AndroidRuntimeSettings.AndroidRuntimeSettings";

/// Section holding iOS packaging settings in DefaultEngine.ini.
pub const IOS_SETTINGS_SECTION: &str = "/Script/IOSRuntimeSettings.IOSRuntimeSettings";

/// Errors that can occur reading or writing project config files.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The well-known INI file does not exist.
  #[error("config file not found: {}", path.display())]
  MissingFile { path: PathBuf },

  /// The file exists but is not valid INI.
  #[error("failed to parse {}: {message}", path.display())]
  Parse { path: PathBuf, message: String },

  /// The requested section/key path does not exist.
  #[error("missing key [{section}] {key} in {}", path.display())]
  MissingKey {
    section: String,
    key: String,
    path: PathBuf,
  },

  /// The key exists but does not hold an integer.
  #[error("key [{section}] {key} is not an integer: {value:?}")]
  NotAnInteger {
    section: String,
    key: String,
    value: String,
  },

  /// I/O error while rewriting the file.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// One of the two well-known project config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFile {
  Engine,
  Game,
}

impl ConfigFile {
  pub fn file_name(&self) -> &'static str {
    match self {
      ConfigFile::Engine => "DefaultEngine.ini",
      ConfigFile::Game => "DefaultGame.ini",
    }
  }

  /// Name used in `-ini:` override tokens.
  pub fn as_str(&self) -> &'static str {
    match self {
      ConfigFile::Engine => "Engine",
      ConfigFile::Game => "Game",
    }
  }
}

impl fmt::Display for ConfigFile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A parsed config file held in memory for reads and batched writes.
#[derive(Debug)]
pub struct ConfigValue {
  ini: Ini,
  path: PathBuf,
}

impl ConfigValue {
  /// Parse `Config/Default{Engine|Game}.ini` under `project_dir`.
  pub fn load(project_dir: &Path, file: ConfigFile) -> Result<Self, ConfigError> {
    let path = project_dir.join("Config").join(file.file_name());

    if !path.is_file() {
      return Err(ConfigError::MissingFile { path });
    }

    // Unreal section and key names are case-significant.
    let mut ini = Ini::new_cs();
    ini.load(&path).map_err(|message| ConfigError::Parse {
      path: path.clone(),
      message,
    })?;

    Ok(Self { ini, path })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn get(&self, section: &str, key: &str) -> Result<String, ConfigError> {
    self.ini.get(section, key).ok_or_else(|| ConfigError::MissingKey {
      section: section.to_string(),
      key: key.to_string(),
      path: self.path.clone(),
    })
  }

  pub fn get_i64(&self, section: &str, key: &str) -> Result<i64, ConfigError> {
    let value = self.get(section, key)?;
    value.trim().parse().map_err(|_| ConfigError::NotAnInteger {
      section: section.to_string(),
      key: key.to_string(),
      value,
    })
  }

  /// Set a key in the held parser. Nothing reaches disk until `write`.
  pub fn set(&mut self, section: &str, key: &str, value: &str) {
    self.ini.set(section, key, Some(value.to_string()));
  }

  /// Rewrite the whole file with the current parser state.
  ///
  /// Clears a read-only attribute first; engine tooling marks these files
  /// read-only when source control is configured.
  pub fn write(&self) -> Result<(), ConfigError> {
    clear_readonly(&self.path)?;
    self.ini.write(&self.path)?;
    Ok(())
  }
}

fn clear_readonly(path: &Path) -> std::io::Result<()> {
  let metadata = std::fs::metadata(path)?;
  let mut permissions = metadata.permissions();

  if permissions.readonly() {
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
    std::fs::set_permissions(path, permissions)?;
  }

  Ok(())
}
