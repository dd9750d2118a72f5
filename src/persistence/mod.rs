//! # Persistence Module
//!
//! Plain-text document storage for the editor. Every save writes a new file
//! named after the local time, so the directory doubles as a history and
//! "open" simply means "load the newest one".
//!
//! ## Error Handling Strategy
//! File operations return [`PersistenceError`], which keeps the offending
//! path next to the I/O cause. The UI turns these into a notice and keeps
//! running; nothing here is fatal.

use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DOCUMENT_PREFIX: &str = "starpad-";
const DOCUMENT_SUFFIX: &str = ".txt";
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to create document directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to list documents in {path}: {source}")]
    ListDir { path: PathBuf, source: io::Error },

    #[error("Failed to write document {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to read document {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

/// Timestamped text documents inside a single directory
#[derive(Clone, Debug)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `text` to a new timestamped document and returns its path
    pub fn save(&self, text: &str) -> Result<PathBuf, PersistenceError> {
        fs::create_dir_all(&self.dir).map_err(|source| PersistenceError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let name = format!(
            "{}{}{}",
            DOCUMENT_PREFIX,
            Local::now().format(TIMESTAMP_FORMAT),
            DOCUMENT_SUFFIX
        );
        let path = self.dir.join(name);

        fs::write(&path, text).map_err(|source| PersistenceError::Write {
            path: path.clone(),
            source,
        })?;

        info!("Saved {} bytes to {}", text.len(), path.display());
        Ok(path)
    }

    /// Loads the newest document; `None` when the directory holds none
    pub fn open_latest(&self) -> Result<Option<(PathBuf, String)>, PersistenceError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Document directory {} does not exist yet", self.dir.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(PersistenceError::ListDir {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut latest: Option<String> = None;
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ListDir {
                path: self.dir.clone(),
                source,
            })?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !is_document_name(&name) {
                continue;
            }
            if latest.as_deref().map_or(true, |current| name.as_str() > current) {
                latest = Some(name);
            }
        }

        let Some(name) = latest else {
            return Ok(None);
        };

        let path = self.dir.join(name);
        let text = fs::read_to_string(&path).map_err(|source| PersistenceError::Read {
            path: path.clone(),
            source,
        })?;

        info!("Opened {}", path.display());
        Ok(Some((path, text)))
    }
}

fn is_document_name(name: &str) -> bool {
    name.starts_with(DOCUMENT_PREFIX) && name.ends_with(DOCUMENT_SUFFIX)
}
