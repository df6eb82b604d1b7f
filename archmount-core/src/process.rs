use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{Error, Result};

/// Captured outcome of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs an external program to completion.
///
/// A non-zero exit code is reported through [`ProcessResult::exit_code`], not
/// as an error; only a failure to launch the program is an `Err`.
pub trait ProcessRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<ProcessResult>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, program: &Path, args: &[String]) -> Result<ProcessResult> {
        (**self).run(program, args)
    }
}

/// Blocking runner backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<ProcessResult> {
        tracing::debug!(program = %program.display(), ?args, "spawning");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::SpawnFailure {
                program: program.to_path_buf(),
                source,
            })?;

        let result = ProcessResult {
            stdout: String::from_utf8(output.stdout).unwrap_or_default(),
            stderr: String::from_utf8(output.stderr).unwrap_or_default(),
            exit_code: exit_code(output.status),
        };

        tracing::debug!(
            program = %program.display(),
            exit_code = result.exit_code,
            "process exited"
        );

        Ok(result)
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => -1,
    }
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
