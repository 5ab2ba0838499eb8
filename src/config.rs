use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::paths::{config_path, ensure_parent_dir};
use crate::platform::Platform;

static USER_STORE: OnceLock<Arc<ConfigStore>> = OnceLock::new();

/// UI preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_title_bar")]
    pub title_bar_enabled: bool,
    #[serde(default)]
    pub persist_selection: bool,
    /// `(runner id, instance name)` restored on start when `persist_selection` is set.
    #[serde(default)]
    pub last_selected_instance: Option<(String, String)>,
}

fn default_title_bar() -> bool {
    Platform::current()
        .map(|platform| platform.uses_custom_title_bar())
        .unwrap_or(true)
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            title_bar_enabled: default_title_bar(),
            persist_selection: false,
            last_selected_instance: None,
        }
    }
}

/// Read the config at `path`, writing defaults there if it does not exist.
pub fn load_config_from(path: &Path) -> Result<ConsoleConfig> {
    if path.is_dir() {
        return Err(AppError::config(format!(
            "Expected file, found directory: {}",
            path.display()
        )));
    }
    if !path.exists() {
        let config = ConsoleConfig::default();
        save_config_to(path, &config)?;
        return Ok(config);
    }
    let content = fs::read_to_string(path).map_err(|e| AppError::config(e.to_string()))?;
    Ok(toml::from_str(&content)?)
}

pub fn save_config_to(path: &Path, config: &ConsoleConfig) -> Result<()> {
    ensure_parent_dir(path)?;
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content).map_err(|e| AppError::config(e.to_string()))
}

/// Config file bound to one path, read once and cached.
pub struct ConfigStore {
    path: PathBuf,
    lock: Mutex<()>,
    cache: RwLock<Option<Arc<ConsoleConfig>>>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cached(&self) -> Option<Arc<ConsoleConfig>> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(Arc::clone)
    }

    /// Caller must hold `self.lock`.
    fn load_locked(&self) -> Result<Arc<ConsoleConfig>> {
        if let Some(config) = self.cached() {
            return Ok(config);
        }
        let config = Arc::new(load_config_from(&self.path)?);
        *self.cache.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::clone(&config));
        Ok(config)
    }

    /// The config, loaded from disk on first use.
    pub fn load(&self) -> Result<Arc<ConsoleConfig>> {
        if let Some(config) = self.cached() {
            return Ok(config);
        }
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.load_locked()
    }

    /// Execute a read-modify-write operation on the config file while
    /// holding a lock.
    pub fn with_config_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut ConsoleConfig) -> Result<T>,
    {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let current = self.load_locked()?;

        let mut updated = (*current).clone();
        let result = f(&mut updated)?;
        save_config_to(&self.path, &updated)?;

        *self.cache.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(updated));

        Ok(result)
    }
}

/// Store for the config file in the user config dir.
pub fn user_config_store() -> Result<Arc<ConfigStore>> {
    if let Some(store) = USER_STORE.get() {
        return Ok(Arc::clone(store));
    }

    let _ = USER_STORE.set(Arc::new(ConfigStore::new(config_path()?)));

    USER_STORE
        .get()
        .map(Arc::clone)
        .ok_or_else(|| AppError::config("USER_STORE not initialized"))
}

/// [`ConfigStore::with_config_mut`] on the user config file.
pub fn with_config_mut<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut ConsoleConfig) -> Result<T>,
{
    user_config_store()?.with_config_mut(f)
}

/// The user config, loaded from disk on first use.
pub fn load_config() -> Result<Arc<ConsoleConfig>> {
    user_config_store()?.load()
}
