//! External command execution.

use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::{YangError, YangResult};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Runs a command string and reports its exit code.
pub trait Executor {
    /// Runs `command` to completion.
    ///
    /// # Returns
    /// * `YangResult<i32>` - Exit code of the command, `0` on success
    ///
    /// # Errors
    /// Only for failures to run the command at all; a non-zero exit is not an error here.
    fn execute(&self, command: &str) -> YangResult<i32>;
}

/// Runs commands through the platform shell with inherited stdio.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    shell: Option<String>,
    timeout: Option<Duration>,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shell<S: Into<String>>(mut self, shell: Option<S>) -> Self {
        self.shell = shell.map(Into::into);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn wait_with_timeout(
        &self,
        command: &str,
        child: &mut std::process::Child,
        timeout: Duration,
    ) -> YangResult<ExitStatus> {
        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if started.elapsed() >= timeout {
                warn!("Killing '{}' after {:?}", command, timeout);
                child.kill()?;
                child.wait()?;
                return Err(YangError::TimeoutError {
                    command: command.to_string(),
                    seconds: timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Executor for ShellExecutor {
    fn execute(&self, command: &str) -> YangResult<i32> {
        let (shell, args) = get_shell(self.shell.as_deref());
        debug!("Running '{}' via {} {:?}", command, shell, args);

        let mut child = Command::new(&shell)
            .args(&args)
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(YangError::IoError)?;

        let status = match self.timeout {
            Some(timeout) => self.wait_with_timeout(command, &mut child, timeout)?,
            None => child.wait().map_err(YangError::IoError)?,
        };

        Ok(exit_code(status))
    }
}

/// Shell binary and the arguments that precede the command string.
pub fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
    if let Some(shell) = override_shell {
        let args = if shell.contains("powershell") || shell.contains("pwsh") {
            vec!["-NoProfile".to_string(), "-Command".to_string()]
        } else if shell.contains("cmd") {
            vec!["/C".to_string()]
        } else {
            vec!["-c".to_string()]
        };
        return (shell.to_string(), args);
    }

    if cfg!(windows) {
        ("cmd.exe".to_string(), vec!["/C".to_string()])
    } else {
        ("/bin/sh".to_string(), vec!["-c".to_string()])
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
