use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key holding the PsTools directory.
pub const PSTOOLS_PATH_KEY: &str = "pstools_path";

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error accessing config at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config at {} is not a valid JSON object of strings: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Flat option name → value mapping persisted as a JSON object.
///
/// Keys this app does not know about are kept and written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    entries: BTreeMap<String, String>,
}

impl Config {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured PsTools directory; an empty string counts as unset.
    pub fn pstools_path(&self) -> Option<PathBuf> {
        self.get(PSTOOLS_PATH_KEY)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }

    pub fn set_pstools_path(&mut self, dir: &Path) {
        self.set(PSTOOLS_PATH_KEY, dir.to_string_lossy());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Config {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Loads and saves [`Config`] as `config.json`.
pub struct SettingsService {
    file_path: PathBuf,
}

impl SettingsService {
    /// `config.json` in the current working directory.
    pub fn new() -> Self {
        Self::with_path(CONFIG_FILE)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { file_path: path.into() }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// A missing file is an empty config. A malformed one is an error: losing
    /// a configured path silently would be worse than refusing to start.
    pub fn load(&self) -> Result<Config, SettingsError> {
        match fs::read_to_string(&self.file_path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                path: self.file_path.clone(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.file_path.display(), "no config file, starting empty");
                Ok(Config::default())
            }
            Err(source) => Err(SettingsError::Io {
                path: self.file_path.clone(),
                source,
            }),
        }
    }

    /// Rewrites the whole file through a sibling `.tmp` and a rename.
    pub fn save(&self, config: &Config) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(config).map_err(SettingsError::Serialize)?;

        if let Some(dir) = self.file_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, content).map_err(|source| SettingsError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.file_path).map_err(|source| SettingsError::Io {
            path: self.file_path.clone(),
            source,
        })?;

        tracing::info!(path = %self.file_path.display(), "config saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| CONFIG_FILE.into());
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }
}

impl Default for SettingsService {
    fn default() -> Self {
        Self::new()
    }
}
