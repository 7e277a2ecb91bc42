//! `.env` key-value file
//!
//! Resolved values (account, project id, access) are cached here between
//! runs. New values are appended; existing lines are never rewritten.

use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_FILE: &str = ".env";

#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
    entries: Vec<(String, String)>,
}

impl EnvFile {
    /// Load the file, or start empty when it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.is_file() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;
            parse_env(&content)
        } else {
            Vec::new()
        };

        debug!(path = %path.display(), count = entries.len(), "Loaded env file");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Value of `key`; a later line wins over an earlier one
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Append `KEY=value` to the file
    pub fn append(&mut self, key: &str, value: &str) -> Result<()> {
        let needs_newline = match std::fs::read(&self.path) {
            Ok(bytes) => !bytes.is_empty() && !bytes.ends_with(b"\n"),
            Err(_) => false,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| ConfigError::io(&self.path, e))?;

        let mut line = String::new();
        if needs_newline {
            line.push('\n');
        }
        line.push_str(&format!("{}={}\n", key, value));
        file.write_all(line.as_bytes())
            .map_err(|e| ConfigError::io(&self.path, e))?;

        debug!(key = %key, path = %self.path.display(), "Appended to env file");
        self.entries.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// Parse `KEY=VALUE` lines
pub fn parse_env(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), strip_quotes(value.trim()).to_string()))
        })
        .collect()
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Variable lookup over the process environment and the `.env` file
///
/// The process environment wins, matching how dotenv loading never
/// overrides variables that are already set.
#[derive(Debug, Clone)]
pub struct Variables {
    process: HashMap<String, String>,
    file: EnvFile,
}

impl Variables {
    pub fn new(process: HashMap<String, String>, file: EnvFile) -> Self {
        Self { process, file }
    }

    /// Snapshot of the current process environment
    pub fn from_process(file: EnvFile) -> Self {
        Self::new(std::env::vars().collect(), file)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.process
            .get(key)
            .map(|v| v.as_str())
            .or_else(|| self.file.get(key))
            .filter(|v| !v.is_empty())
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Cache a resolved value in the `.env` file
    pub fn persist(&mut self, key: &str, value: &str) -> Result<()> {
        self.file.append(key, value)
    }

    pub fn env_file(&self) -> &EnvFile {
        &self.file
    }
}
