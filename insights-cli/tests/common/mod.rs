//! Common test utilities for CLI integration tests.
//!
//! Every test runs `pi` with a cleared environment and a config file inside
//! its own temporary directory, so no test sees the developer's credentials
//! or another test's values.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with an isolated config file.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the config file `pi` reads and writes
    pub config_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The config file is not created; `pi` creates it after the first
    /// successful command.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let config_path = temp_path.join("pi").join("config.json");

        Self {
            temp_dir,
            temp_path,
            config_path,
        }
    }

    /// Get a bare command builder with a cleared environment.
    ///
    /// Use this to test global flag behavior, including `--config`.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("pi").expect("Failed to find pi binary");
        cmd.env_clear();
        cmd.env("HOME", &self.temp_path);
        cmd
    }

    /// Get a command builder with `--config` pointing into the temp dir.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--config").arg(&self.config_path);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write the config file with the given JSON contents.
    pub fn write_config(&self, contents: &str) {
        let dir = self.config_path.parent().expect("config path has a parent");
        std::fs::create_dir_all(dir).expect("Failed to create config dir");
        std::fs::write(&self.config_path, contents).expect("Failed to write config");
    }

    /// Read the config file back as JSON.
    ///
    /// # Panics
    /// Panics if the file is missing or not a JSON document.
    pub fn read_config(&self) -> serde_json::Value {
        let contents = std::fs::read_to_string(&self.config_path).expect("config file exists");
        serde_json::from_str(&contents).expect("config file is JSON")
    }

    /// Write a credentials set that points at an unroutable service.
    ///
    /// Commands get past the `NotConfigured` check and fail on the network
    /// instead, which is enough to test everything before the request.
    pub fn write_credentials(&self) {
        self.write_config(
            r#"{
  "APIHost": "http://127.0.0.1:9",
  "TenantID": "tenant-1",
  "IssuerID": "http://127.0.0.1:9/oauth/token",
  "ClientID": "app",
  "ClientSecret": "secret"
}"#,
        );
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
