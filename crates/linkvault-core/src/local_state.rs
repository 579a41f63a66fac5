use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Small key/value file for client-side preferences.
///
/// Bookmarks themselves are never stored here. Every `set` is written
/// through to disk straight away.
#[derive(Debug, Clone)]
pub struct LocalState {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    values: BTreeMap<String, String>,
}

impl LocalState {
    /// Open the state file at its default location.
    ///
    /// Only a missing data directory is an error; an unreadable file is
    /// replaced by an empty state (see [`LocalState::open_or_empty`]).
    pub fn open_default() -> crate::Result<Self> {
        Ok(Self::open_or_empty(Self::default_path()?))
    }

    /// Like [`LocalState::open`], but a file that can't be read or parsed
    /// yields an empty state at the same path. The next `set` overwrites it.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(state) => state,
            Err(e) => {
                warn!("Ignoring unreadable state file {}: {}", path.display(), e);
                Self {
                    path,
                    values: BTreeMap::new(),
                }
            }
        }
    }

    /// Open a state file; a missing file is an empty state
    pub fn open(path: impl Into<PathBuf>) -> crate::Result<Self> {
        let path = path.into();

        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            let file: StateFile = serde_json::from_str(&contents)?;
            file.values
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Store a value and persist the whole file
    pub fn set(&mut self, key: &str, value: &str) -> crate::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn save(&self) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = StateFile {
            values: self.values.clone(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    /// XDG data dir on Linux, Application Support on macOS, AppData on Windows
    fn default_path() -> crate::Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?
            .join("linkvault");

        Ok(data_dir.join("state.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let state = LocalState::open(dir.path().join("state.json")).unwrap();
        assert_eq!(state.get("theme"), None);
    }

    #[test]
    fn test_set_persists_immediately() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut state = LocalState::open(&path).unwrap();
        state.set("theme", "dark").unwrap();

        let reopened = LocalState::open(&path).unwrap();
        assert_eq!(reopened.get("theme"), Some("dark"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            LocalState::open(&path),
            Err(crate::Error::SerializationError(_))
        ));
    }

    #[test]
    fn test_corrupt_file_opens_empty_and_is_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut state = LocalState::open_or_empty(&path);
        assert_eq!(state.path(), path.as_path());
        assert_eq!(state.get("theme"), None);

        state.set("theme", "dark").unwrap();
        let reopened = LocalState::open(&path).unwrap();
        assert_eq!(reopened.get("theme"), Some("dark"));
    }
}
