//! uepack-lib: Unreal Engine packaging automation
//!
//! This crate provides the building blocks the `uepack` CLI composes:
//! - `project`: locating the `.uproject` descriptor and deriving context
//! - `config`: reading and rewriting the engine's INI files
//! - `args`: assembling the `BuildCookRun` argument list
//! - `engine`: finding an engine installation and its UAT entry point
//! - `process`: running the external tool and classifying its output
//! - `artifact`: moving packaged artifacts to versioned names
//! - `version`: semantic-version bumps of config fields

pub mod args;
pub mod artifact;
pub mod config;
pub mod engine;
pub mod process;
pub mod project;
pub mod request;
pub mod util;
pub mod version;
