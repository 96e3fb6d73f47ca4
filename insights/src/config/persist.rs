//! Persistence sink.
//!
//! After a command completes, its resolved values are written back to the
//! persisted config file so the next invocation can pick them up from the
//! config-file layer. Session-only options are reset first so they never
//! outlive the invocation that set them.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::context::GlobalFlags;
use crate::config::loader::PersistedConfig;
use crate::config::option::OptionValue;
use crate::config::registry::CommandOptionSet;
use crate::error::{Error, Result};

/// Options reset to these values before every write.
#[must_use]
pub fn session_defaults() -> [(&'static str, OptionValue); 4] {
    [
        ("tail", OptionValue::Bool(false)),
        ("verbose", OptionValue::Bool(false)),
        ("interactive", OptionValue::Bool(false)),
        ("containerLogSink", OptionValue::Int(1)),
    ]
}

/// Writes a command's value store to the persisted config file.
#[derive(Debug, Clone)]
pub struct PersistenceSink {
    path: PathBuf,
}

impl PersistenceSink {
    /// Creates a sink writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this sink writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resets session options, then writes the whole value store.
    ///
    /// Entries already in the file that the command does not declare are
    /// kept, so one command never erases another command's values. Session
    /// options already in the file are rewritten with their defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the directory or file cannot be created and
    /// `Io` if the write or the final rename fails. Callers treat both as
    /// non-fatal.
    pub fn commit(&self, set: &mut CommandOptionSet, globals: &mut GlobalFlags) -> Result<PathBuf> {
        // 1. session reset
        globals.verbose = false;
        globals.interactive = false;
        for (name, value) in session_defaults() {
            if set.declares(name) {
                set.set(name, value)?;
            }
        }

        // 2. ensure dir and file
        self.ensure_file()?;

        // 3. point the set at the file
        set.set_persist_path(self.path.clone());

        // 4. write the store
        let mut merged = match PersistedConfig::load(&self.path) {
            Ok(existing) => existing.values().clone(),
            Err(e) => {
                log::warn!("replacing unreadable config file: {e}");
                serde_json::Map::new()
            }
        };
        for (name, value) in session_defaults() {
            if merged.contains_key(name) {
                merged.insert(name.to_string(), value.to_json());
            }
        }
        merged.extend(set.store().to_json_map());

        let mut contents = serde_json::to_string_pretty(&serde_json::Value::Object(merged))?;
        contents.push('\n');
        self.replace_file(contents.as_bytes())?;

        log::debug!(
            "persisted {} value(s) of '{}' to {}",
            set.store().len(),
            set.command(),
            self.path.display()
        );
        Ok(self.path.clone())
    }

    /// Writes a sibling temp file and renames it over the config file, so a
    /// crash mid-write never leaves a truncated file behind.
    fn replace_file(&self, contents: &[u8]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    fn ensure_file(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::InvalidPath {
                    path: parent.to_path_buf(),
                    reason: format!("Failed to create config directory: {e}"),
                })?;
            }
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::InvalidPath {
                path: self.path.clone(),
                reason: format!("Failed to create config file: {e}"),
            })?;
        Ok(())
    }
}
