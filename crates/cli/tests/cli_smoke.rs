//! CLI smoke tests for uepack.
//!
//! These tests verify that the CLI commands run without panicking and
//! return appropriate exit codes. The unix-only build tests run against a
//! fake engine whose UAT script emits the real tool's phase banners.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the uepack binary.
fn uepack_cmd() -> Command {
  cargo_bin_cmd!("uepack")
}

const DEFAULT_GAME_INI: &str = "\
[/Script/EngineSettings.GeneralProjectSettings]
ProjectName=Demo Game
ProjectVersion=1.2.3
";

const DEFAULT_ENGINE_INI: &str = "\
[/Script/AndroidRuntimeSettings.AndroidRuntimeSettings]
PackageName=com.example.demo
VersionDisplayName=1.2.3
StoreVersion=7

[/Script/IOSRuntimeSettings.IOSRuntimeSettings]
VersionInfo=1.2.3
";

/// Create a temp directory holding a minimal project.
fn temp_project() -> TempDir {
  let temp = TempDir::new().unwrap();
  std::fs::write(temp.path().join("Demo.uproject"), "{}\n").unwrap();
  let config_dir = temp.path().join("Config");
  std::fs::create_dir_all(&config_dir).unwrap();
  std::fs::write(config_dir.join("DefaultGame.ini"), DEFAULT_GAME_INI).unwrap();
  std::fs::write(config_dir.join("DefaultEngine.ini"), DEFAULT_ENGINE_INI).unwrap();
  temp
}

/// Create a fake engine install whose UAT script runs `body`.
#[cfg(unix)]
fn fake_engine(body: &str) -> TempDir {
  use std::os::unix::fs::PermissionsExt;

  let temp = TempDir::new().unwrap();
  let batch_files = temp.path().join("Engine").join("Build").join("BatchFiles");
  std::fs::create_dir_all(&batch_files).unwrap();

  let script = batch_files.join("RunUAT.sh");
  std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();

  let mut permissions = std::fs::metadata(&script).unwrap().permissions();
  permissions.set_mode(0o755);
  std::fs::set_permissions(&script, permissions).unwrap();

  temp
}

/// UAT script body mimicking a successful Android packaging run.
#[cfg(unix)]
const SUCCESSFUL_RUN: &str = r#"out=""
for arg in "$@"; do
  case "$arg" in
    -ArchiveDirectory=*) out="${arg#-ArchiveDirectory=}" ;;
  esac
done
echo "********** BUILD COMMAND STARTED **********"
echo "********** COOK COMMAND STARTED **********"
mkdir -p "$out"
touch "$out/Demo-arm64.apk"
echo "********** ARCHIVE COMMAND STARTED **********"
echo "BUILD SUCCESSFUL"
exit 0"#;

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  uepack_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  uepack_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("uepack"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["build", "version"] {
    uepack_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

// =============================================================================
// build
// =============================================================================

#[test]
fn build_without_project_fails() {
  let temp = TempDir::new().unwrap();

  uepack_cmd()
    .args(["build", "android", "client", "development"])
    .arg("--cwd")
    .arg(temp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("uproject"));
}

#[test]
fn build_rejects_unknown_platform() {
  let temp = temp_project();

  uepack_cmd()
    .args(["build", "mac", "client", "development"])
    .arg("--cwd")
    .arg(temp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown platform"));
}

#[test]
fn build_rejects_malformed_define() {
  let temp = temp_project();

  uepack_cmd()
    .args(["build", "android", "client", "development"])
    .args(["--define", "NOVALUE"])
    .arg("--cwd")
    .arg(temp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("KEY=VALUE"));
}

#[cfg(unix)]
#[test]
fn build_without_engine_fails() {
  let project = temp_project();
  let empty = TempDir::new().unwrap();

  uepack_cmd()
    .args(["build", "android", "client", "development"])
    .arg("--cwd")
    .arg(project.path())
    .env("UEPACK_ENGINE_ROOT", empty.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("engine location"));
}

#[cfg(unix)]
#[test]
fn build_expose_prints_invocation() {
  let project = temp_project();
  let engine = fake_engine(SUCCESSFUL_RUN);

  uepack_cmd()
    .args(["build", "android", "client", "development", "--expose"])
    .arg("--cwd")
    .arg(project.path())
    .env("UEPACK_ENGINE_ROOT", engine.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("BuildCookRun"))
    .stdout(predicate::str::contains("-Project="))
    .stdout(predicate::str::contains("RunUAT.sh"));
}

#[cfg(unix)]
#[test]
fn build_packages_and_renames_artifact() {
  let project = temp_project();
  let engine = fake_engine(SUCCESSFUL_RUN);

  uepack_cmd()
    .args(["build", "android", "client", "development"])
    .arg("--cwd")
    .arg(project.path())
    .env("UEPACK_ENGINE_ROOT", engine.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("Building..."))
    .stdout(predicate::str::contains("Cooking content..."));

  let output_dir = project.path().join("Packaged").join("AndroidClientDevelopment");
  assert!(output_dir.join("Demo-Development-1.2.3.apk").is_file());
  // The rename is a copy; the tool's original output stays in place.
  assert!(output_dir.join("Demo-arm64.apk").is_file());
}

#[cfg(unix)]
#[test]
fn build_production_flavor_keeps_flavor_in_artifact_name() {
  let project = temp_project();
  let engine = fake_engine(SUCCESSFUL_RUN);

  uepack_cmd()
    .args(["build", "android", "client", "development", "production"])
    .arg("--cwd")
    .arg(project.path())
    .env("UEPACK_ENGINE_ROOT", engine.path())
    .assert()
    .success();

  let output_dir = project
    .path()
    .join("Packaged")
    .join("AndroidClientDevelopmentproduction");
  assert!(output_dir.join("Demo-Development-production-1.2.3.apk").is_file());
}

#[cfg(unix)]
#[test]
fn build_no_copy_moves_artifact() {
  let project = temp_project();
  let engine = fake_engine(SUCCESSFUL_RUN);

  uepack_cmd()
    .args(["build", "android", "client", "development", "--no-copy"])
    .arg("--cwd")
    .arg(project.path())
    .env("UEPACK_ENGINE_ROOT", engine.path())
    .assert()
    .success();

  let output_dir = project.path().join("Packaged").join("AndroidClientDevelopment");
  assert!(output_dir.join("Demo-Development-1.2.3.apk").is_file());
  assert!(!output_dir.join("Demo-arm64.apk").exists());
}

#[cfg(unix)]
#[test]
fn build_flavor_flag_matches_positional() {
  let project = temp_project();
  let engine = fake_engine(SUCCESSFUL_RUN);

  uepack_cmd()
    .args(["build", "android", "client", "development", "--flavor", "staging", "--expose"])
    .arg("--cwd")
    .arg(project.path())
    .env("UEPACK_ENGINE_ROOT", engine.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("PackageName=com.example.demo.staging"));
}

#[cfg(unix)]
#[test]
fn build_tool_failure_is_an_error() {
  let project = temp_project();
  let engine = fake_engine("exit 1");

  uepack_cmd()
    .args(["build", "android", "client", "development"])
    .arg("--cwd")
    .arg(project.path())
    .env("UEPACK_ENGINE_ROOT", engine.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("Build failed"));
}

#[cfg(unix)]
#[test]
fn build_fails_when_no_artifact_is_produced() {
  let project = temp_project();
  // Successful exit without touching any .apk file.
  let engine = fake_engine("echo \"BUILD SUCCESSFUL\"\nexit 0");

  uepack_cmd()
    .args(["build", "android", "client", "development"])
    .arg("--cwd")
    .arg(project.path())
    .env("UEPACK_ENGINE_ROOT", engine.path())
    .assert()
    .failure();
}

// =============================================================================
// version up
// =============================================================================

#[test]
fn version_up_patch_bumps_project_version() {
  let temp = temp_project();

  uepack_cmd()
    .args(["version", "up", "patch"])
    .arg("--cwd")
    .arg(temp.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("1.2.3 -> 1.2.4"));

  let game = std::fs::read_to_string(temp.path().join("Config").join("DefaultGame.ini")).unwrap();
  assert!(game.contains("ProjectVersion=1.2.4"));
}

#[test]
fn version_up_android_bumps_store_version() {
  let temp = temp_project();

  uepack_cmd()
    .args(["version", "up", "minor", "--android"])
    .arg("--cwd")
    .arg(temp.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("7 -> 8"));

  let engine = std::fs::read_to_string(temp.path().join("Config").join("DefaultEngine.ini")).unwrap();
  assert!(engine.contains("VersionDisplayName=1.3.0"));
  assert!(engine.contains("StoreVersion=8"));
}

#[test]
fn version_up_json_output_is_parseable() {
  let temp = temp_project();

  let assert = uepack_cmd()
    .args(["version", "up", "patch", "--json"])
    .arg("--cwd")
    .arg(temp.path())
    .assert()
    .success();

  let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
  let changes: serde_json::Value = serde_json::from_str(&stdout).unwrap();

  assert_eq!(changes[0]["key"], "ProjectVersion");
  assert_eq!(changes[0]["new"], "1.2.4");
}

#[test]
fn version_up_rejects_unknown_release_type() {
  let temp = temp_project();

  uepack_cmd()
    .args(["version", "up", "huge"])
    .arg("--cwd")
    .arg(temp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown release type"));
}

#[test]
fn version_up_invalid_semver_leaves_file_untouched() {
  let temp = temp_project();
  let game_path = temp.path().join("Config").join("DefaultGame.ini");
  std::fs::write(
    &game_path,
    "[/Script/EngineSettings.GeneralProjectSettings]\nProjectVersion=not-semver\n",
  )
  .unwrap();
  let before = std::fs::read(&game_path).unwrap();

  uepack_cmd()
    .args(["version", "up", "patch"])
    .arg("--cwd")
    .arg(temp.path())
    .assert()
    .failure();

  assert_eq!(std::fs::read(&game_path).unwrap(), before);
}

#[test]
fn version_up_without_project_fails() {
  let temp = TempDir::new().unwrap();

  uepack_cmd()
    .args(["version", "up", "patch"])
    .arg("--cwd")
    .arg(temp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("uproject"));
}
