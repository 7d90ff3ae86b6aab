use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::error::{DeployError, DeployResult};

/// Executes external programs on behalf of the workflow.
///
/// Every system mutation goes through this trait so the pipeline
/// can be driven against a recording fake in tests.
pub trait Runner {
    /// Run a command and capture its trimmed stdout. Fails if the
    /// command returns a non-zero exit code.
    fn run(&self, program: &str, args: &[&str]) -> DeployResult<String>;

    /// Like [`Runner::run`] with `dir` as working directory.
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> DeployResult<String>;

    /// Run a command with stdin/stdout/stderr inherited.
    fn run_interactive(&self, program: &str, args: &[&str]) -> DeployResult<()>;

    /// Like [`Runner::run_interactive`] with `dir` as working
    /// directory.
    fn run_interactive_in(&self, dir: &Path, program: &str, args: &[&str]) -> DeployResult<()>;

    /// Run a command that pipes its stdin from a byte slice.
    fn run_with_stdin(&self, program: &str, args: &[&str], stdin_data: &[u8])
    -> DeployResult<String>;

    /// Run a shell pipeline (via `sh -c`).
    fn run_pipeline(&self, shell_cmd: &str) -> DeployResult<()> {
        self.run_interactive("sh", &["-c", shell_cmd])
    }

    /// Check if a command exists on PATH.
    fn command_exists(&self, program: &str) -> bool;
}

/// [`Runner`] backed by real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct System;

impl Runner for System {
    fn run(&self, program: &str, args: &[&str]) -> DeployResult<String> {
        capture(Command::new(program).args(args), program, args)
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> DeployResult<String> {
        capture(Command::new(program).args(args).current_dir(dir), program, args)
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> DeployResult<()> {
        inherit(Command::new(program).args(args), program, args)
    }

    fn run_interactive_in(&self, dir: &Path, program: &str, args: &[&str]) -> DeployResult<()> {
        inherit(Command::new(program).args(args).current_dir(dir), program, args)
    }

    fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        stdin_data: &[u8],
    ) -> DeployResult<String> {
        use std::io::Write;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| not_found_or_io(e, program))?;

        if let Some(stdin) = &mut child.stdin {
            stdin.write_all(stdin_data)?;
        }
        drop(child.stdin.take());

        let output = child.wait_with_output()?;
        finish(&output, program, args)
    }

    fn command_exists(&self, program: &str) -> bool {
        Command::new("which")
            .arg(program)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }
}

fn capture(command: &mut Command, program: &str, args: &[&str]) -> DeployResult<String> {
    let output = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| not_found_or_io(e, program))?;
    finish(&output, program, args)
}

fn inherit(command: &mut Command, program: &str, args: &[&str]) -> DeployResult<()> {
    let status = command
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| not_found_or_io(e, program))?;

    if status.success() {
        Ok(())
    } else {
        Err(DeployError::CommandFailed {
            command: format_command(program, args),
            status,
        })
    }
}

fn finish(output: &Output, program: &str, args: &[&str]) -> DeployResult<String> {
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !stderr.is_empty() {
            eprintln!("stderr: {stderr}");
        }
        Err(DeployError::CommandFailed {
            command: format_command(program, args),
            status: output.status,
        })
    }
}

fn not_found_or_io(e: std::io::Error, program: &str) -> DeployError {
    if e.kind() == std::io::ErrorKind::NotFound {
        DeployError::CommandNotFound(program.to_string())
    } else {
        DeployError::Io(e)
    }
}

/// Join a program and its arguments for display.
#[must_use]
pub fn format_command(program: &str, args: &[&str]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().map(|a| (*a).to_string()));
    parts.join(" ")
}
