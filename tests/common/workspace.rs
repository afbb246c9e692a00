//! Temporary directory fixture for CLI tests
//!
//! Every workspace carries its own config file so tests never read the
//! user's configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let workspace = Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        };
        workspace.write_config("");
        workspace
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    pub fn write_config(&self, toml: &str) -> &Self {
        fs::write(self.config_path(), toml).expect("Failed to write config");
        self
    }

    /// Register `address` (`host:port`) for a language and call type.
    pub fn with_server(&self, language: &str, call_type: &str, address: &str) -> &Self {
        let (host, port) = address.rsplit_once(':').expect("address must be host:port");
        let mut config = fs::read_to_string(self.config_path()).unwrap_or_default();
        config.push_str(&format!(
            "\n[[servers]]\nlanguage = \"{}\"\ncall_type = \"{}\"\nhost = \"{}\"\nport = {}\n",
            language, call_type, host, port
        ));
        self.write_config(&config)
    }

    pub fn add_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.path().join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    pub fn read_file(&self, relative_path: &str) -> String {
        fs::read_to_string(self.path().join(relative_path)).expect("Failed to read file")
    }

    /// Run the semfora-tags binary inside the workspace
    pub fn run_cli(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_semfora-tags"))
            .current_dir(self.path())
            .arg("--config")
            .arg(self.config_path())
            .args(args)
            .env_remove("GTAGS_PROXY")
            .env_remove("SEMFORA_TAGS_CONFIG")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run CLI")
    }

    /// Run CLI and expect success, return stdout
    pub fn run_cli_success(&self, args: &[&str]) -> String {
        let output = self.run_cli(args);
        assert!(
            output.status.success(),
            "CLI failed with args {:?}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run CLI and expect failure, return (exit code, stderr)
    pub fn run_cli_failure(&self, args: &[&str]) -> (i32, String) {
        let output = self.run_cli(args);
        assert!(
            !output.status.success(),
            "CLI unexpectedly succeeded with args {:?}\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        (
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).to_string(),
        )
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
