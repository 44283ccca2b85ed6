use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::Error;
use crate::store::TaskStore;
use crate::tasks::{Task, TaskStatus};


/// Splits a command line on whitespace. The first token is the program, the
/// rest are passed as arguments verbatim. Quoting is not interpreted, so a
/// multi-word quoted argument is not supported.
pub fn split_command(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}


#[derive(Debug, Default)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}


/// Runs one task's command to completion and records the outcome.
///
/// The process outcome is deliberately not distinguished: a command that
/// exits non-zero or fails to launch still marks the task `Completed`, and
/// the exit code is never recorded. Failures are visible only in the logs.
/// Returns the captured standard output for synchronous callers; the
/// dispatcher's background path discards it.
pub async fn run(store: &TaskStore, mut task: Task) -> Result<String, Error> {
    let output = match spawn(&split_command(&task.command)).await {
        Ok(output) => output,
        Err(err) => {
            warn!(task = %task.id, %err, "command failed to launch");
            CapturedOutput::default()
        }
    };

    if !output.stdout.is_empty() {
        debug!(task = %task.id, stdout = %output.stdout, "command output");
    }
    if !output.stderr.is_empty() {
        debug!(task = %task.id, stderr = %output.stderr, "command output");
    }

    task.status = TaskStatus::Completed;
    store.update(&task).await?;
    debug!(task = %task.id, "task completed");

    Ok(output.stdout)
}


async fn spawn(args: &[String]) -> Result<CapturedOutput, Error> {
    let (program, rest) = args
        .split_first()
        .ok_or_else(|| Error::Validation("empty command".to_string()))?;

    let out = Command::new(program)
        .args(rest)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !out.status.success() {
        debug!(status = ?out.status, "command exited non-zero");
    }

    Ok(CapturedOutput {
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
    })
}
