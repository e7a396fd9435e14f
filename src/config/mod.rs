use std::path::PathBuf;

use thiserror::Error;

use crate::exec::{BuildSteps, Step};

pub mod parser;

pub const DEFAULT_CREDENTIAL_ENV: &str = "EMAIL_TOKEN";
pub const DEFAULT_CONFIGURE_CMD: &str = "./bootstrap-configure";
pub const DEFAULT_BUILD_CMD: &str = "make";
pub const DEFAULT_SIGNATURE: &str = "Build Checker";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to find config file: {0}")]
    NotFound(PathBuf),

    #[error("Unable to read config file {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Malformed section [{section}]: {reason}")]
    Malformed {
        section: &'static str,
        reason: String,
    },

    #[error("Missing section [{0}] in config file")]
    MissingSection(&'static str),

    #[error("Missing key `{key}` in section [{section}]")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },

    #[error("Invalid value `{value}` for `{key}`: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    pub email: NotificationConfig,
    pub build: BuildConfig,
}

/// Who receives the report. `only-maintainers = yes` selects the maintainer
/// list, anything else mails the single `default-to` address.
#[derive(Debug, Clone, PartialEq)]
pub enum Recipients {
    Maintainers(Vec<String>),
    DefaultTo(String),
}

impl Recipients {
    pub fn resolve(&self) -> Vec<String> {
        match self {
            Recipients::Maintainers(list) => list.clone(),
            Recipients::DefaultTo(addr) => vec![addr.clone()],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationConfig {
    pub server: String,
    pub port: u16,
    /// Sender address, also the SMTP login.
    pub user: String,
    pub starttls: bool,
    pub recipients: Recipients,
    /// Delivery timeout in seconds. `None` waits for the server indefinitely.
    pub timeout: Option<u64>,
    /// Environment variable read at send time for the SMTP password.
    pub credential_env: String,
    pub subject_prefix: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub configure: String,
    pub build: String,
    /// Per-step timeout in seconds. `None` waits indefinitely.
    pub timeout: Option<u64>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            configure: DEFAULT_CONFIGURE_CMD.to_string(),
            build: DEFAULT_BUILD_CMD.to_string(),
            timeout: None,
        }
    }
}

impl BuildConfig {
    pub fn steps(&self) -> BuildSteps {
        BuildSteps {
            configure: Step::new("configure", &self.configure),
            build: Step::new("build", &self.build),
        }
    }
}
