//! Custom preset persistence.
//!
//! Presets live in a single collection under one key of a string key-value
//! store, serialised as a JSON object mapping preset name to
//! [`ParameterSet`]. Reading never fails: a missing key, an unreadable
//! backend or a corrupt document all look like "no custom presets", and a
//! single malformed entry is skipped without hiding the others.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::{BuiltinPreset, ParameterSet, Preset};
use crate::error::{Error, Result};

/// Key the preset collection is stored under.
pub const STORE_KEY: &str = "shatterSoundPresets";

/// Minimal string key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store, used by tests and when no data dir is available.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Platform data directory for the application, if one can be determined.
    pub fn default_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "shatter").map(|dirs| dirs.data_dir().to_path_buf())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // Write-then-rename so a crash never leaves half a document behind
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Custom preset CRUD on top of a [`KeyValueStore`].
pub struct PresetStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> PresetStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_inner(self) -> S {
        self.backend
    }

    /// Every custom preset that parses, by name.
    pub fn load(&self) -> BTreeMap<String, ParameterSet> {
        self.read_raw()
            .into_iter()
            .filter_map(|(name, value)| match serde_json::from_value(value) {
                Ok(params) => Some((name, params)),
                Err(err) => {
                    warn!(preset = %name, error = %err, "skipping malformed preset");
                    None
                }
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<ParameterSet> {
        let value = self.read_raw().remove(name)?;
        match serde_json::from_value(value) {
            Ok(params) => Some(params),
            Err(err) => {
                warn!(preset = %name, error = %err, "malformed preset");
                None
            }
        }
    }

    /// Store `params` under `name` (trimmed), replacing any preset of that name.
    ///
    /// Returns the trimmed name actually used.
    pub fn save(&mut self, name: &str, params: &ParameterSet) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyPresetName);
        }

        let mut raw = self.read_raw();
        let replaced = raw
            .insert(name.to_string(), serde_json::to_value(params)?)
            .is_some();
        self.write_raw(&raw)?;

        info!(preset = %name, replaced, "saved preset");
        Ok(name.to_string())
    }

    /// Delete `name` after `confirm` agrees.
    ///
    /// Returns `Ok(false)` when confirmation is declined or no such preset
    /// exists; nothing is written in either case.
    pub fn delete<F>(&mut self, name: &str, confirm: F) -> Result<bool>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(name) {
            return Ok(false);
        }

        let mut raw = self.read_raw();
        if raw.remove(name).is_none() {
            return Ok(false);
        }
        self.write_raw(&raw)?;

        info!(preset = %name, "deleted preset");
        Ok(true)
    }

    /// Built-in presets followed by custom presets.
    pub fn list(&self) -> Vec<Preset> {
        BuiltinPreset::ALL
            .into_iter()
            .map(Preset::builtin)
            .chain(
                self.load()
                    .into_iter()
                    .map(|(name, params)| Preset::custom(name, params)),
            )
            .collect()
    }

    fn read_raw(&self) -> Map<String, Value> {
        let contents = match self.backend.get(STORE_KEY) {
            Ok(Some(contents)) => contents,
            Ok(None) => return Map::new(),
            Err(err) => {
                warn!(error = %err, "could not read preset store");
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("preset store is not a JSON object; ignoring it");
                Map::new()
            }
            Err(err) => {
                warn!(error = %err, "corrupt preset store; ignoring it");
                Map::new()
            }
        }
    }

    fn write_raw(&mut self, raw: &Map<String, Value>) -> Result<()> {
        let contents = serde_json::to_string(raw)?;
        self.backend.set(STORE_KEY, &contents)
    }
}
