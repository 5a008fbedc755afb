use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::KeyValueStorage;
use crate::shared::errors::{AppError, AppResult};

const FILE_EXTENSION: &str = "json";

/// File-backed storage: one file per key inside a directory.
///
/// Keys are percent-encoded into file names. Writes go to a temporary file
/// that is then renamed over the target, so a crash mid-write leaves the old
/// value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            AppError::StorageError(format!(
                "Failed to create storage dir {}: {}",
                dir.display(),
                e
            ))
        })?;
        log::debug!("File storage ready at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", urlencoding::encode(key), FILE_EXTENSION))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::StorageError(format!(
                "Failed to read '{}': {}",
                key, e
            ))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        let target = self.path_for(key);
        let tmp = target.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &target).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            AppError::StorageError(format!("Failed to write '{}': {}", key, e))
        })
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> AppResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match urlencoding::decode(stem) {
                Ok(key) => keys.push(key.into_owned()),
                Err(e) => log::warn!("Skipping undecodable storage file {}: {}", path.display(), e),
            }
        }
        keys.sort();
        Ok(keys)
    }
}
