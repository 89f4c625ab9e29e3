use crate::error::RunnerError;
use crate::invocation::Invocation;
use log::debug;
use std::process::{Command, ExitStatus, Stdio};

pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), RunnerError>;
}

// An interrupted wait leaves the child running.
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), RunnerError> {
        let mut child = Command::new(invocation.program())
            .args(invocation.args())
            .envs(invocation.env_overrides())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| RunnerError::LaunchFailure {
                binary: invocation.program().to_path_buf(),
                source: e,
            })?;
        debug!("Spawned {} (pid {})", invocation.program().display(), child.id());

        let status = child.wait().map_err(wait_error)?;

        check_status(status)
    }
}

fn wait_error(e: std::io::Error) -> RunnerError {
    match e.kind() {
        std::io::ErrorKind::Interrupted => RunnerError::Interrupted,
        _ => RunnerError::Io(e),
    }
}

fn check_status(status: ExitStatus) -> Result<(), RunnerError> {
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(RunnerError::NonZeroExit(code)),
        None => Err(RunnerError::Terminated { signal: signal(&status) }),
    }
}

#[cfg(unix)]
fn signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal(_status: &ExitStatus) -> Option<i32> {
    None
}
