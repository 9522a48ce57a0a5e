mod build;
mod version;

pub use build::{BuildArgs, cmd_build};
pub use version::{VersionCommand, cmd_version};
