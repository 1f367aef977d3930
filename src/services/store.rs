//! JSON file store for the accounts export and the subscriptions sink

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::de::DeserializeOwned;

use crate::types::{Account, Result, SubreportError, Subscription};

pub const DEFAULT_INPUT: &str = "accounts.json";
pub const DEFAULT_OUTPUT: &str = "subscriptions.json";

pub struct Store {
    input: PathBuf,
    output: PathBuf,
    pretty: bool,
}

impl Store {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            pretty: false,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn input_path(&self) -> &Path {
        &self.input
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Load the accounts export. Missing or malformed input is an error.
    pub fn load_accounts(&self) -> Result<Vec<Account>> {
        let accounts: Vec<Account> = read_json(&self.input)?;
        tracing::debug!(path = %self.input.display(), count = accounts.len(), "loaded accounts");
        Ok(accounts)
    }

    /// Load a previously saved subscriptions file
    pub fn load_subscriptions(&self) -> Result<Vec<Subscription>> {
        read_json(&self.output)
    }

    /// Serialize subscriptions using the configured formatting
    pub fn to_json(&self, subs: &[Subscription]) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(subs)
        } else {
            serde_json::to_string(subs)
        };
        json.map_err(|e| SubreportError::Parse(format!("serialization failed: {}", e)))
    }

    /// Overwrite the output file using atomic write (temp file + rename)
    /// with exclusive lock.
    pub fn save_subscriptions(&self, subs: &[Subscription]) -> Result<()> {
        let content = self.to_json(subs)?;

        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.output.with_extension("json.tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        let target = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.output)?;
        target.lock_exclusive()?;

        fs::rename(&temp_path, &self.output)?;

        let _ = target.unlock();
        tracing::info!(path = %self.output.display(), count = subs.len(), "wrote subscriptions");
        Ok(())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT, DEFAULT_OUTPUT)
    }
}

/// Read and parse a JSON file under a shared lock
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    file.lock_shared()?;

    let mut content = String::new();
    let read = BufReader::new(&file).read_to_string(&mut content);
    let _ = file.unlock();
    read?;

    serde_json::from_str(&content)
        .map_err(|e| SubreportError::Parse(format!("{}: {}", path.display(), e)))
}
