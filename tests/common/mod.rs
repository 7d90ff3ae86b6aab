#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use hoist::cmd::{Runner, format_command};
use hoist::error::{DeployError, DeployResult};
use hoist::prompt::Prompter;

pub const MANIFEST: &str = "\
services:
  rails:
    image: chatwoot/chatwoot:latest
    env_file: .env
    ports:
      - '3000:3000'
  postgres:
    image: pgvector/pgvector:pg16
    ports:
      - '127.0.0.1:5432:5432'
";

pub const RUNNING: &str = r#"{"Service":"rails","State":"running","Status":"Up 31 seconds"}
{"Service":"postgres","State":"running","Status":"Up 31 seconds"}"#;

pub const EXITED: &str = r#"[{"Service":"rails","State":"exited","Status":"Exited (1) 20 seconds ago"}]"#;

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub command: String,
    pub dir: Option<PathBuf>,
    pub stdin: Option<String>,
}

/// Recording [`Runner`] with scripted outputs and failures.
///
/// Commands are matched by substring on `program args...`.
pub struct FakeRunner {
    pub calls: RefCell<Vec<Call>>,
    outputs: Vec<(String, String)>,
    failures: Vec<String>,
    missing: Vec<String>,
    manifest: Option<String>,
}

impl FakeRunner {
    /// A host where everything succeeds.
    pub fn healthy() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            outputs: vec![
                ("id -un".into(), "deploy".into()),
                ("id -u".into(), "1000".into()),
                ("docker compose ps".into(), RUNNING.into()),
            ],
            failures: Vec::new(),
            missing: Vec::new(),
            manifest: Some(MANIFEST.into()),
        }
    }

    pub fn output(mut self, pattern: &str, stdout: &str) -> Self {
        self.outputs.insert(0, (pattern.into(), stdout.into()));
        self
    }

    pub fn fail(mut self, pattern: &str) -> Self {
        self.failures.push(pattern.into());
        self
    }

    pub fn missing(mut self, program: &str) -> Self {
        self.missing.push(program.into());
        self
    }

    pub fn manifest(mut self, content: Option<&str>) -> Self {
        self.manifest = content.map(str::to_string);
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.command.clone()).collect()
    }

    pub fn position(&self, pattern: &str) -> Option<usize> {
        self.commands().iter().position(|c| c.contains(pattern))
    }

    pub fn ran(&self, pattern: &str) -> bool {
        self.position(pattern).is_some()
    }

    pub fn call(&self, pattern: &str) -> Option<Call> {
        self.calls
            .borrow()
            .iter()
            .find(|c| c.command.contains(pattern))
            .cloned()
    }

    fn invoke(
        &self,
        dir: Option<&Path>,
        program: &str,
        args: &[&str],
        stdin: Option<&[u8]>,
    ) -> DeployResult<String> {
        let command = format_command(program, args);
        self.calls.borrow_mut().push(Call {
            command: command.clone(),
            dir: dir.map(Path::to_path_buf),
            stdin: stdin.map(|b| String::from_utf8_lossy(b).into_owned()),
        });

        if self.failures.iter().any(|f| command.contains(f.as_str())) {
            return Err(DeployError::CommandFailed {
                command,
                status: ExitStatus::from_raw(256),
            });
        }

        if program == "curl" && args.first() == Some(&"-fsSL") {
            if let (Some(content), Some(target)) = (&self.manifest, args.get(2)) {
                std::fs::write(target, content)?;
            }
        }

        Ok(self
            .outputs
            .iter()
            .find(|(p, _)| command.contains(p.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default())
    }
}

impl Runner for FakeRunner {
    fn run(&self, program: &str, args: &[&str]) -> DeployResult<String> {
        self.invoke(None, program, args, None)
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> DeployResult<String> {
        self.invoke(Some(dir), program, args, None)
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> DeployResult<()> {
        self.invoke(None, program, args, None).map(|_| ())
    }

    fn run_interactive_in(&self, dir: &Path, program: &str, args: &[&str]) -> DeployResult<()> {
        self.invoke(Some(dir), program, args, None).map(|_| ())
    }

    fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        stdin_data: &[u8],
    ) -> DeployResult<String> {
        self.invoke(None, program, args, Some(stdin_data))
    }

    fn command_exists(&self, program: &str) -> bool {
        !self.missing.iter().any(|m| m == program)
    }
}

/// [`Prompter`] answering from a fixed list.
pub struct Script {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
    pub secret_asked: usize,
    unreadable: Option<String>,
}

impl Script {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| (*a).to_string()).collect(),
            asked: Vec::new(),
            secret_asked: 0,
            unreadable: None,
        }
    }

    /// Fail prompts whose label starts with `label`, like a closed stdin.
    pub fn unreadable(mut self, label: &str) -> Self {
        self.unreadable = Some(label.into());
        self
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, label: &str) -> String {
        self.asked.push(label.to_string());
        self.answers
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted answer for prompt: {label}"))
    }
}

impl Prompter for Script {
    fn ask(&mut self, label: &str) -> DeployResult<String> {
        if self
            .unreadable
            .as_deref()
            .is_some_and(|l| label.starts_with(l))
        {
            self.asked.push(label.to_string());
            return Err(DeployError::Other("prompt failed: EOF".into()));
        }
        Ok(self.next(label))
    }

    fn ask_secret(&mut self, label: &str) -> DeployResult<String> {
        self.secret_asked += 1;
        Ok(self.next(label))
    }
}
