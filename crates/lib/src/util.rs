//! Shared utilities.
//!
//! Glob helpers with the recency tie-break used for project and artifact
//! discovery, plus the `\uXXXX` escaping the UAT config-override layer
//! expects for display-name values.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use glob::glob;

/// Escape every code point of `text` as a fixed-width `\uXXXX` sequence.
///
/// The width is fixed at four hex digits: code points above U+FFFF keep
/// only their last four digits. The UAT config layer consumes the
/// truncated form, so this is intentional.
pub fn escape_to_unicode(text: &str) -> String {
  let mut result = String::with_capacity(text.len() * 6);

  for c in text.chars() {
    let hex = format!("000{:x}", c as u32);
    result.push_str("\\u");
    result.push_str(&hex[hex.len() - 4..]);
  }

  result
}

/// Find all files matching `pattern`, skipping unreadable entries.
pub fn find_files(pattern: &str) -> Result<Vec<PathBuf>, glob::PatternError> {
  Ok(glob(pattern)?.filter_map(Result::ok).collect())
}

/// Pick the most recently modified path.
///
/// Paths with unreadable metadata sort oldest.
pub fn newest_file(paths: Vec<PathBuf>) -> Option<PathBuf> {
  paths.into_iter().max_by_key(|path| modified(path))
}

fn modified(path: &Path) -> SystemTime {
  std::fs::metadata(path)
    .and_then(|meta| meta.modified())
    .unwrap_or(SystemTime::UNIX_EPOCH)
}
