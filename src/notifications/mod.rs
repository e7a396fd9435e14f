use chrono::NaiveDate;
use thiserror::Error;

use crate::{config::NotificationConfig, exec::BuildResult, git::repo::RepoSnapshot};

pub mod sender;

/// Body text reported for a successful build.
pub const SUCCESS_OUTPUT: &str = "success";

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Unable to find EMAIL Token in ${0}. Cannot send email")]
    MissingCredential(String),

    #[error("Invalid email address `{address}`: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Email transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub subject: String,
    pub body: String,
}

/// Fills the report template for one build result.
pub fn compose(
    config: &NotificationConfig,
    result: &BuildResult,
    snapshot: &RepoSnapshot,
    description: &str,
    date: NaiveDate,
) -> Message {
    let label = result.status.label();
    let output = if result.status.is_success() {
        SUCCESS_OUTPUT
    } else {
        result.failure_output()
    };

    let prefix = if config.subject_prefix.is_empty() {
        String::new()
    } else {
        format!("{} ", config.subject_prefix)
    };
    let subject = format!(
        "{prefix}Build Check Result: {label} - {}",
        date.format("%Y-%m-%d")
    );

    let body = format!(
        "This is automated email and please do not reply to this email!

Build Test Report:

Result: {label}

Repo: {url}:{branch}

Last Commit:
-----------------------------------------------------------------------
{description}
-----------------------------------------------------------------------

Output:
--------------
{output}

---
Regards,
{signature}
",
        url = snapshot.remote_url,
        branch = snapshot.branch,
        signature = config.signature,
    );

    Message { subject, body }
}
