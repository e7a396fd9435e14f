pub mod command;
pub mod runner;

/// A named command line, split with shell rules at execution time.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub name: String,
    pub cmd: String,
}

impl Step {
    pub fn new(name: &str, cmd: &str) -> Self {
        Self {
            name: name.to_string(),
            cmd: cmd.to_string(),
        }
    }
}

/// The fixed pair a build check is made of, always run configure first.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSteps {
    pub configure: Step,
    pub build: Step,
}

impl BuildSteps {
    /// Steps in execution order, each with the status reported when it fails.
    pub fn ordered(&self) -> [(&Step, BuildStatus); 2] {
        [
            (&self.configure, BuildStatus::ConfigureFailed),
            (&self.build, BuildStatus::BuildFailed),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Success,
    ConfigureFailed,
    BuildFailed,
}

impl BuildStatus {
    pub fn is_success(&self) -> bool {
        *self == BuildStatus::Success
    }

    /// Result label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            BuildStatus::Success => "SUCCESS",
            BuildStatus::ConfigureFailed | BuildStatus::BuildFailed => "FAIL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildResult {
    pub status: BuildStatus,
    pub stdout: String,
    pub stderr: String,
}

impl BuildResult {
    pub fn success() -> Self {
        Self {
            status: BuildStatus::Success,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Text reported for a failed step: stderr, or stdout when the step
    /// wrote nothing to stderr.
    pub fn failure_output(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}
