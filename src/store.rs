/*!
 * Persistent key-value store backed by a JSON file
 */

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, ResultExt};

/// Default location of the store: `<config dir>/glm/config.json`
pub fn default_store_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("glm")
        .join("config.json")
}

/// A JSON object persisted to disk after every write
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl ConfigStore {
    /// Open the store at `path`, starting empty if the file doesn't exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let text = fs::read_to_string(&path).at_path(&path)?;
            if text.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&text)? {
                    Value::Object(map) => map,
                    _ => crate::bail!(
                        Config,
                        "{} must contain a JSON object",
                        path.display()
                    ),
                }
            }
        } else {
            Map::new()
        };

        debug!("Opened config store {}", path.display());
        Ok(Self { path, values })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read `key` as `T`; a value of the wrong shape is a configuration error
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| crate::error!(Config, "invalid value for `{}`: {}", key, e)),
        }
    }

    /// Store `value` under `key` and persist the store
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.values
            .insert(key.to_string(), serde_json::to_value(value)?);
        self.save()
    }

    /// Write the store through a temporary file renamed into place
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).at_path(parent)?;
            }
        }

        let text = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).at_path(&tmp)?;
        fs::rename(&tmp, &self.path).at_path(&self.path)?;
        Ok(())
    }
}
