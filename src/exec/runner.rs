use std::path::Path;

use tracing::{error, info};

use crate::exec::{
    BuildResult, BuildSteps,
    command::{CommandOutput, ExecError, run_command},
};

/// Runs the configure and build steps against a working copy.
#[derive(Debug, Clone, Default)]
pub struct BuildRunner {
    timeout_secs: Option<u64>,
}

impl BuildRunner {
    pub fn new(timeout_secs: Option<u64>) -> Self {
        Self { timeout_secs }
    }

    /// Executes the steps in order and stops at the first one that does not
    /// exit with 0. Only that step's output ends up in the result.
    ///
    /// A step that cannot be launched or that times out is a failed step.
    /// Other execution errors are returned as is.
    pub async fn run(&self, src_dir: &Path, steps: &BuildSteps) -> Result<BuildResult, ExecError> {
        for (step, failure) in steps.ordered() {
            let output = match run_command(&step.cmd, src_dir, self.timeout_secs).await {
                Ok(output) => output,
                Err(e) if e.is_step_failure() => {
                    error!("ERROR: {e}");
                    CommandOutput::failed(e.to_string())
                }
                Err(e) => return Err(e),
            };

            if !output.success() {
                error!("{} failed (status={:?})", step.name, output.status_code);
                error!("{}", output.stderr);
                return Ok(BuildResult {
                    status: failure,
                    stdout: output.stdout,
                    stderr: output.stderr,
                });
            }
            info!("{} succeeded", step.name);
        }

        Ok(BuildResult::success())
    }
}
