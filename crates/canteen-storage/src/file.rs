// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session storage backed by one JSON file.
//!
//! The whole key/value map is loaded on open and rewritten on every change,
//! through a sibling temp file and a rename, so a later process sees either
//! the old map or the new one.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use canteen_core::{CanteenError, SessionStorage};
use tracing::{debug, warn};

/// A [`SessionStorage`] whose contents survive process restarts.
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStorage {
    /// Opens the store at `path`, creating parent directories as needed.
    ///
    /// A missing file is an empty session. An unreadable or corrupt file is
    /// logged and also treated as empty; it is replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CanteenError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, "create", e))?;
        }

        let items = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "discarding corrupt session file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "session file unreadable, starting empty");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), keys = items.len(), "session storage opened");

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), CanteenError> {
        let text = serde_json::to_string_pretty(items).map_err(|e| CanteenError::Storage {
            message: format!("failed to encode session file: {e}"),
            source: Some(Box::new(e)),
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, text).map_err(|e| storage_error(&tmp, "write", e))?;
        fs::rename(&tmp, &self.path).map_err(|e| storage_error(&self.path, "replace", e))
    }
}

fn storage_error(path: &Path, action: &str, e: io::Error) -> CanteenError {
    CanteenError::Storage {
        message: format!("failed to {action} {}: {e}", path.display()),
        source: Some(Box::new(e)),
    }
}

impl SessionStorage for FileSessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CanteenError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), CanteenError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value);
        self.flush(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), CanteenError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        if items.remove(key).is_some() {
            self.flush(&items)?;
        }
        Ok(())
    }
}
