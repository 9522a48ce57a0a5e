//! Build request types.
//!
//! A `BuildRequest` is parsed once from CLI input and, together with the
//! derived project context, fully determines the argument list handed to
//! the external build tool.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Flavor name that ships with the project's real package identity and
/// therefore never emits config overrides.
pub const PRODUCTION_FLAVOR: &str = "production";

/// Target platform of a packaging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
  Android,
  Windows,
  Linux,
}

impl Platform {
  pub fn as_str(&self) -> &'static str {
    match self {
      Platform::Android => "Android",
      Platform::Windows => "Windows",
      Platform::Linux => "Linux",
    }
  }

  /// Artifact extensions to collect after a successful packaging run.
  ///
  /// Shipping Android builds also produce an app bundle next to the APK.
  /// Linux archives are directories, so there is nothing to collect by
  /// extension.
  pub fn artifact_extensions(&self, config: BuildConfig) -> Vec<&'static str> {
    match self {
      Platform::Android => {
        if config == BuildConfig::Shipping {
          vec!["apk", "aab"]
        } else {
          vec!["apk"]
        }
      }
      Platform::Windows => vec!["exe"],
      Platform::Linux => vec![],
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Platform {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "android" => Ok(Platform::Android),
      "windows" => Ok(Platform::Windows),
      "linux" => Ok(Platform::Linux),
      other => Err(format!("unknown platform: {other}")),
    }
  }
}

/// Whether the packaged binary is a game client or a dedicated server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunType {
  Client,
  Server,
}

impl RunType {
  pub fn as_str(&self) -> &'static str {
    match self {
      RunType::Client => "Client",
      RunType::Server => "Server",
    }
  }
}

impl fmt::Display for RunType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for RunType {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "client" => Ok(RunType::Client),
      "server" => Ok(RunType::Server),
      other => Err(format!("unknown run type: {other}")),
    }
  }
}

/// Engine build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildConfig {
  Test,
  Debug,
  Development,
  Shipping,
}

impl BuildConfig {
  pub fn as_str(&self) -> &'static str {
    match self {
      BuildConfig::Test => "Test",
      BuildConfig::Debug => "Debug",
      BuildConfig::Development => "Development",
      BuildConfig::Shipping => "Shipping",
    }
  }
}

impl fmt::Display for BuildConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for BuildConfig {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "test" => Ok(BuildConfig::Test),
      "debug" => Ok(BuildConfig::Debug),
      "development" => Ok(BuildConfig::Development),
      "shipping" => Ok(BuildConfig::Shipping),
      other => Err(format!("unknown build config: {other}")),
    }
  }
}

/// Everything a packaging run needs from the command line.
///
/// Immutable once constructed.
#[derive(Debug, Clone)]
pub struct BuildRequest {
  pub platform: Platform,
  pub run_type: RunType,
  pub config: BuildConfig,
  pub flavor: Option<String>,
  /// Extra variables exposed to the build tool through its environment.
  pub defines: BTreeMap<String, String>,
  pub verbose: bool,
}

impl BuildRequest {
  /// The flavor that should produce package-identity overrides, if any.
  ///
  /// The production flavor keeps the configured package name and display
  /// name, so it never produces overrides.
  pub fn flavor_override(&self) -> Option<&str> {
    match self.flavor.as_deref() {
      Some(flavor) if flavor != PRODUCTION_FLAVOR => Some(flavor),
      _ => None,
    }
  }
}
