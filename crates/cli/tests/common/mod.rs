//! Helpers for driving the `hk` binary

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// `hk` invocation with an isolated config directory
pub struct HkCommand {
    working_dir: PathBuf,
    config_home: PathBuf,
    args: Vec<String>,
    stdin_data: Option<String>,
}

impl HkCommand {
    pub fn new(working_dir: impl AsRef<Path>, config_home: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            config_home: config_home.as_ref().to_path_buf(),
            args: Vec::new(),
            stdin_data: None,
        }
    }

    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn stdin(&mut self, data: &str) -> &mut Self {
        self.stdin_data = Some(data.to_string());
        self
    }

    pub fn execute(&self) -> Result<CommandResult> {
        let mut command = Command::new(env!("CARGO_BIN_EXE_hk"));
        command
            .args(&self.args)
            .current_dir(&self.working_dir)
            .env("XDG_CONFIG_HOME", &self.config_home)
            .env("HOME", &self.config_home)
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().context("Failed to spawn hk")?;
        if let Some(mut stdin) = child.stdin.take() {
            if let Some(data) = &self.stdin_data {
                stdin.write_all(data.as_bytes())?;
            }
        }
        let output = child.wait_with_output()?;
        Ok(CommandResult::from(output))
    }
}

pub struct CommandResult {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for CommandResult {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl CommandResult {
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "hk failed ({:?})\nstdout:\n{}\nstderr:\n{}",
            self.code, self.stdout, self.stderr
        );
        self
    }
}

/// A tree with a config home next to it, both removed on drop
pub struct Workspace {
    _temp: tempfile::TempDir,
    pub root: PathBuf,
    pub config_home: PathBuf,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir()?;
        let root = temp.path().join("tree");
        let config_home = temp.path().join("config");
        std::fs::create_dir_all(&root)?;
        std::fs::create_dir_all(&config_home)?;
        Ok(Self {
            _temp: temp,
            root,
            config_home,
        })
    }

    pub fn write(&self, rel: &str, content: &str) -> Result<()> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.root.join(rel))?)
    }

    pub fn hk(&self, args: &[&str]) -> HkCommand {
        let mut command = HkCommand::new(&self.root, &self.config_home);
        command.args(args);
        command
    }
}
