//! Saved gateway credentials.
//!
//! The dashboard remembers where the gateway lives and how to talk to it,
//! so the `--gateway-url` and `--token` flags are only needed on the first
//! run. Credentials are stored as a small JSON file under the platform
//! config directory and rewritten after every successful connect.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// File name of the stored credentials.
const CREDENTIALS_FILE: &str = "credentials.json";

/// Gateway connection credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Base URL of the gateway (or of a relay in front of it).
    pub base_url: String,

    /// Bearer token for the gateway API.
    pub token: String,
}

impl Credentials {
    /// Creates new credentials.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Returns the default credentials path under the platform config
    /// directory, e.g. `~/.config/agm/credentials.json` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("agm").join(CREDENTIALS_FILE))
    }

    /// Loads credentials from a file.
    ///
    /// A missing file is not an error; it just means this is a first run.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            debug!(path = %path.display(), "No saved credentials");
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        let credentials = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), "Loaded saved credentials");
        Ok(Some(credentials))
    }

    /// Saves credentials, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        debug!(path = %path.display(), "Saved credentials");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TuiError;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("credentials.json");

        let credentials = Credentials::new("http://localhost:8080", "tok-123");
        credentials.save(&path).expect("save");

        let loaded = Credentials::load(&path).expect("load");
        assert_eq!(loaded, Some(credentials));
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("credentials.json");

        let loaded = Credentials::load(&path).expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "{ not json").expect("write");

        match Credentials::load(&path) {
            Err(TuiError::ParseError(_)) => {}
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_default_path_ends_with_expected_name() {
        if let Some(path) = Credentials::default_path() {
            assert!(path.ends_with("agm/credentials.json"));
        }
    }
}
