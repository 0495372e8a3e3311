use crate::error::{LiveloError, Result};
use std::collections::HashMap;
use std::fs::{self, File, create_dir_all};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Key holding the serialized favorites list.
pub const FAVORITES_KEY: &str = "livelo_favoritos";

/// Key holding the theme preference.
pub const THEME_KEY: &str = "livelo_theme";

/// A scoped key-value region that survives restarts.
///
/// Writes either complete or fail; a reader never sees a partially written
/// value.
pub trait Storage: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Volatile storage, used in tests and when the on-disk scope is unusable.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Directory-backed storage: one `<key>.json` file per key inside the scope
/// directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) the scope directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        create_dir_all(&dir).map_err(|source| LiveloError::Storage {
            key: dir.display().to_string(),
            source,
        })?;
        log::debug!("storage scope at {}", dir.display());
        Ok(FileStorage { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(LiveloError::Storage {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let storage_err = |source| LiveloError::Storage {
            key: key.to_string(),
            source,
        };

        let mut file = File::create(&tmp).map_err(storage_err)?;
        file.write_all(value.as_bytes()).map_err(storage_err)?;
        file.sync_all().map_err(storage_err)?;
        fs::rename(&tmp, &path).map_err(storage_err)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(LiveloError::Storage {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("scope")).unwrap();

        assert_eq!(storage.get(THEME_KEY).unwrap(), None);
        storage.set(THEME_KEY, "dark").unwrap();
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert!(dir.path().join("scope/livelo_theme.json").exists());
        assert!(!dir.path().join("scope/livelo_theme.json.tmp").exists());

        storage.remove(THEME_KEY).unwrap();
        storage.remove(THEME_KEY).unwrap();
        assert_eq!(storage.get(THEME_KEY).unwrap(), None);
    }

    #[test]
    fn keys_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("../escape", "x").unwrap();
        assert!(dir.path().join("___escape.json").exists());
        assert_eq!(storage.get("../escape").unwrap().as_deref(), Some("x"));
    }
}
