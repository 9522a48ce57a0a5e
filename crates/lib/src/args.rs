//! Argument construction for the external build tool.
//!
//! `RunUAT BuildCookRun` is order-sensitive for `-ini:` override tokens
//! (later overrides of the same key win) and order-insensitive for the
//! fixed action flags; the tested ordering below is preserved exactly.

use crate::config::{ANDROID_SETTINGS_SECTION, ConfigFile};
use crate::project::ProjectContext;
use crate::request::{BuildConfig, BuildRequest};
use crate::util::escape_to_unicode;

/// A single override of one INI key at tool invocation time, without
/// touching the file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOverride {
  pub file: ConfigFile,
  pub section: String,
  pub key: String,
  pub value: String,
}

impl ConfigOverride {
  pub fn engine(section: &str, key: &str, value: String) -> Self {
    Self {
      file: ConfigFile::Engine,
      section: section.to_string(),
      key: key.to_string(),
      value,
    }
  }

  /// Serialize to the tool's override token form.
  pub fn to_arg(&self) -> String {
    format!("-ini:{}:[{}]:{}={}", self.file, self.section, self.key, self.value)
  }
}

/// Assemble the ordered `BuildCookRun` argument list.
pub fn build_cook_run_args(request: &BuildRequest, context: &ProjectContext) -> Vec<String> {
  let mut args = vec![format!("-Project={}", context.project_file.display())];

  if let Some(flavor) = request.flavor_override() {
    args.push(
      ConfigOverride::engine(
        ANDROID_SETTINGS_SECTION,
        "PackageName",
        format!("{}.{}", context.package_name, flavor.to_lowercase()),
      )
      .to_arg(),
    );
    args.push(
      ConfigOverride::engine(
        ANDROID_SETTINGS_SECTION,
        "ApplicationDisplayName",
        escape_to_unicode(&format!("{} [{}]", context.project_name, flavor)),
      )
      .to_arg(),
    );
  }

  let distribution = if request.config == BuildConfig::Shipping {
    "-Distribution"
  } else {
    ""
  };

  args.extend([
    "-SaveConfigOverrides".to_string(),
    "-NoP4".to_string(),
    format!("-ClientConfig={}", request.config),
    format!("-ServerConfig={}", request.config),
    "-NoCompileEditor".to_string(),
    "-UTF8Output".to_string(),
    format!("-Platform={}", request.platform),
    "-CookFlavor=ETC2".to_string(),
    distribution.to_string(),
    "-Build".to_string(),
    "-Cook".to_string(),
    "-Stage".to_string(),
    "-Package".to_string(),
    "-Archive".to_string(),
    "-CookCultures=en".to_string(),
    "-UnVersionedCookedContent".to_string(),
    format!("-ArchiveDirectory={}", context.output_dir.display()),
  ]);

  // An empty token corrupts the tool's argument parsing.
  args.retain(|arg| !arg.is_empty());

  args
}
