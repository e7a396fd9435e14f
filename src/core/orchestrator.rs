use std::{fmt, path::PathBuf};

use chrono::Local;
use tracing::{debug, error, info};

use crate::{
    config::CheckerConfig,
    core::{
        CheckError, EXIT_BUILD_FAILED, EXIT_CONFIGURE_FAILED, EXIT_OK,
        state::{read_marker, same_commit, write_marker},
    },
    exec::{BuildResult, BuildStatus, runner::BuildRunner},
    git::{
        repo::{RepoInspector, RepoSnapshot},
        tracking::MarkerTracker,
    },
    notifications::{compose, sender::Notifier, sender::Transport},
};

/// Everything a single run needs, resolved by the caller.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: CheckerConfig,
    pub src_dir: PathBuf,
    pub marker_path: PathBuf,
    pub notify_on_success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// HEAD still matches the marker, nothing was touched.
    NoChange,
    Built(BuildStatus),
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::NoChange | RunOutcome::Built(BuildStatus::Success) => EXIT_OK,
            RunOutcome::Built(BuildStatus::ConfigureFailed) => EXIT_CONFIGURE_FAILED,
            RunOutcome::Built(BuildStatus::BuildFailed) => EXIT_BUILD_FAILED,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::NoChange => write!(f, "no new commit"),
            RunOutcome::Built(status) => write!(f, "build {status:?}"),
        }
    }
}

/// Sequences one build check: inspect, compare, persist, build, report.
pub struct Orchestrator<'a> {
    ctx: &'a RunContext,
    inspector: &'a dyn RepoInspector,
    tracker: &'a dyn MarkerTracker,
    transport: &'a dyn Transport,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        ctx: &'a RunContext,
        inspector: &'a dyn RepoInspector,
        tracker: &'a dyn MarkerTracker,
        transport: &'a dyn Transport,
    ) -> Self {
        Self {
            ctx,
            inspector,
            tracker,
            transport,
        }
    }

    pub async fn run(&self) -> Result<RunOutcome, CheckError> {
        self.check_paths()?;

        let last_known = read_marker(&self.ctx.marker_path).map_err(CheckError::ReadMarker)?;
        info!("Last known HEAD SHA: {last_known}");

        let snapshot = self.inspector.inspect(&self.ctx.src_dir)?;
        if same_commit(&snapshot.head_commit, &last_known) {
            info!("Exit Success. No new commit found from the last run");
            return Ok(RunOutcome::NoChange);
        }

        let description = self
            .inspector
            .top_commit_description(&self.ctx.src_dir, &snapshot);
        debug!("HEAD Log:\n{description}");

        self.persist(&snapshot)?;

        let runner = BuildRunner::new(self.ctx.config.build.timeout);
        let result = runner
            .run(&self.ctx.src_dir, &self.ctx.config.build.steps())
            .await
            .map_err(CheckError::Unexpected)?;
        info!("Checkbuild status={:?}", result.status);

        if result.status.is_success() {
            info!("Build Success. Done");
            if self.ctx.notify_on_success {
                self.report(&result, &snapshot, &description).await;
            }
        } else {
            error!("Checkbuild failed. Send out notification");
            self.report(&result, &snapshot, &description).await;
        }

        Ok(RunOutcome::Built(result.status))
    }

    fn check_paths(&self) -> Result<(), CheckError> {
        if !self.ctx.marker_path.exists() {
            return Err(CheckError::MissingPath {
                what: "Head SHA file",
                path: self.ctx.marker_path.clone(),
            });
        }
        if !self.ctx.src_dir.exists() {
            return Err(CheckError::MissingPath {
                what: "source",
                path: self.ctx.src_dir.clone(),
            });
        }
        Ok(())
    }

    /// The marker moves to the new head before anything is built, so a
    /// commit is inspected once whatever its build outcome.
    fn persist(&self, snapshot: &RepoSnapshot) -> Result<(), CheckError> {
        write_marker(&self.ctx.marker_path, &snapshot.head_commit)
            .map_err(CheckError::WriteMarker)?;

        if let Err(e) = self.tracker.record(&self.ctx.marker_path) {
            error!(
                "Unable to commit file {}: {e:#}",
                self.ctx.marker_path.display()
            );
        }
        Ok(())
    }

    async fn report(&self, result: &BuildResult, snapshot: &RepoSnapshot, description: &str) {
        let message = compose(
            &self.ctx.config.email,
            result,
            snapshot,
            description,
            Local::now().date_naive(),
        );
        info!("EMAIL MESSAGE:\n{}\n\n{}", message.subject, message.body);

        let notifier = Notifier::new(&self.ctx.config.email, self.transport);
        if let Err(e) = notifier.deliver(&message).await {
            error!("Unable to send notification: {e}");
        }
    }
}
