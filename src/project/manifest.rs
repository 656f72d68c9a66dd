use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// File listing the build entries, looked up in the working directory
pub const MANIFEST_FILE: &str = "init_scripts.json";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("init_scripts.json not found. Run `polybundle init` first.")]
    NotFound,
    #[error("Failed to read init_scripts.json: {0}")]
    Read(#[source] io::Error),
    #[error("Failed to read init_scripts.json: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("init_scripts.json must be an array of string paths.")]
    Shape,
}

/// Ordered list of entry paths, stored as a plain JSON array of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryManifest {
    pub entries: Vec<String>,
}

impl EntryManifest {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Entries written by `polybundle init`
    pub fn example() -> Self {
        Self::new(vec![
            "./dev/init1.lua".to_string(),
            "./dev/init2.lua".to_string(),
        ])
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ManifestError::NotFound)
            }
            Err(err) => return Err(ManifestError::Read(err)),
        };
        Self::from_json(&raw)
    }

    /// Malformed JSON and well-formed JSON of the wrong shape are reported
    /// separately.
    pub fn from_json(raw: &str) -> Result<Self, ManifestError> {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(ManifestError::Syntax)?;
        Self::deserialize(value).map_err(|_| ManifestError::Shape)
    }

    /// Pretty JSON with two-space indentation and a trailing newline
    pub fn to_json(&self) -> String {
        let mut json = serde_json::to_string_pretty(self).unwrap_or_else(|_| "[]".to_string());
        json.push('\n');
        json
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
