use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    cli::Cli,
    config::parser::load_config,
    core::{
        CheckError,
        orchestrator::{Orchestrator, RunContext, RunOutcome},
    },
    git::{
        repo::GitInspector,
        tracking::{GitTracker, MarkerTracker, NoTracking},
    },
    notifications::sender::SmtpMailer,
};

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Builds the [`RunContext`] from the command line: resolves paths and
/// loads the configuration file.
pub fn build_run_context(cli: &Cli) -> Result<RunContext, CheckError> {
    let src_dir = absolute(&cli.src);
    debug!("SRC DIR: {}", src_dir.display());
    let marker_path = absolute(&cli.head_sha_file);
    debug!("SHA FILE: {}", marker_path.display());

    let config = load_config(&absolute(&cli.config_file))?;
    debug!("Config: {config:?}");

    Ok(RunContext {
        config,
        src_dir,
        marker_path,
        notify_on_success: cli.email_on_success,
    })
}

/// Runs one build check with the production collaborators.
pub async fn handle_check(cli: &Cli) -> Result<RunOutcome, CheckError> {
    let ctx = build_run_context(cli)?;

    let inspector = GitInspector::default();
    let git_tracker = GitTracker::new(&cli.tracking_remote, &cli.tracking_branch);
    let tracker: &dyn MarkerTracker = if cli.no_tracking {
        &NoTracking
    } else {
        &git_tracker
    };

    Orchestrator::new(&ctx, &inspector, tracker, &SmtpMailer)
        .run()
        .await
}
