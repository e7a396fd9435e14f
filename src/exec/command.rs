use std::{io, path::Path, process::Stdio, time::Duration};

use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
    time::timeout,
};
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to run cmd `{cmd}`: {reason}")]
    Launch { cmd: String, reason: String },

    #[error("cmd `{cmd}` timed out after {secs} seconds, process killed")]
    Timeout { cmd: String, secs: u64 },

    #[error("I/O failure while running `{cmd}`: {source}")]
    Io {
        cmd: String,
        #[source]
        source: io::Error,
    },
}

impl ExecError {
    /// Launch failures and timeouts count as a failed step, anything else
    /// is a broken run.
    pub fn is_step_failure(&self) -> bool {
        matches!(self, ExecError::Launch { .. } | ExecError::Timeout { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }

    /// Output of a step that never produced an exit status.
    pub fn failed(reason: String) -> Self {
        Self {
            status_code: None,
            stdout: String::new(),
            stderr: reason,
        }
    }
}

/// Runs `cmd_line` in `current_dir`, logging each output line as it arrives.
///
/// Both streams are drained to the end before the exit status is collected.
/// With `timeout_secs = None` the call waits for the process indefinitely.
pub async fn run_command(
    cmd_line: &str,
    current_dir: &Path,
    timeout_secs: Option<u64>,
) -> Result<CommandOutput, ExecError> {
    let launch_err = |reason: String| ExecError::Launch {
        cmd: cmd_line.to_string(),
        reason,
    };
    let io_err = |source: io::Error| ExecError::Io {
        cmd: cmd_line.to_string(),
        source,
    };

    let parts = shell_words::split(cmd_line).map_err(|e| launch_err(e.to_string()))?;
    let (program, args) = parts
        .split_first()
        .ok_or_else(|| launch_err("empty command".to_string()))?;

    info!("CMD: {cmd_line}");
    let mut child = Command::new(program)
        .args(args)
        .current_dir(current_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| launch_err(e.to_string()))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io_err(io::Error::other("stdout was not captured")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io_err(io::Error::other("stderr was not captured")))?;

    let run_future = async {
        let (out, err) = tokio::try_join!(drain(stdout, "stdout"), drain(stderr, "stderr"))?;
        let status = child.wait().await?;
        Ok::<_, io::Error>((status, out, err))
    };

    let finished = match timeout_secs {
        Some(secs) => match timeout(Duration::from_secs(secs), run_future).await {
            Ok(finished) => finished,
            Err(_) => {
                child.kill().await.ok();
                return Err(ExecError::Timeout {
                    cmd: cmd_line.to_string(),
                    secs,
                });
            }
        },
        None => run_future.await,
    };
    let (status, stdout, stderr) = finished.map_err(io_err)?;

    debug!(">> STDERR\n{stderr}");
    Ok(CommandOutput {
        status_code: status.code(),
        stdout,
        stderr,
    })
}

async fn drain<R: AsyncRead + Unpin>(stream: R, name: &'static str) -> io::Result<String> {
    let mut reader = BufReader::new(stream);
    let mut captured = String::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&line);
        debug!(stream = name, "{}", text.trim_end_matches(['\n', '\r']));
        captured.push_str(&text);
    }

    Ok(captured)
}
