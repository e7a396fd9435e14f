use std::path::PathBuf;

use thiserror::Error;

use crate::{
    config::ConfigError, core::state::StateError, exec::command::ExecError,
    git::repo::RepoAccessError,
};

pub mod orchestrator;
pub mod state;

pub const EXIT_OK: u8 = 0;
pub const EXIT_SETUP: u8 = 1;
pub const EXIT_CONFIGURE_FAILED: u8 = 2;
pub const EXIT_BUILD_FAILED: u8 = 3;
/// Same value as `EX_SOFTWARE` from sysexits.h.
pub const EXIT_UNEXPECTED: u8 = 70;

/// Errors that end a run before or outside the build/report path.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Unable to read email configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Unable to find {what} from: {path}")]
    MissingPath { what: &'static str, path: PathBuf },

    #[error("Unable to read HEAD SHA from file: {0}")]
    ReadMarker(#[source] StateError),

    #[error("Unable to write new HEAD SHA to file: {0}")]
    WriteMarker(#[source] StateError),

    #[error(transparent)]
    RepoAccess(#[from] RepoAccessError),

    #[error("Exception while building: {0}")]
    Unexpected(#[from] ExecError),
}

impl CheckError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CheckError::Unexpected(_) => EXIT_UNEXPECTED,
            _ => EXIT_SETUP,
        }
    }
}
