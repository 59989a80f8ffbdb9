//! Storage location resolution.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use sqlhost_core::constants::MEMORY_LOCATION;
use sqlhost_core::errors::EngineError;

/// Where a named database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Memory,
    File(PathBuf),
}

impl Location {
    /// Resolve a database name against the configured base directory.
    ///
    /// - no location: `base/<name>`
    /// - `":memory:"`: private in-memory database
    /// - absolute directory: `<location>/<name>`
    /// - relative directory: `base/<location>/<name>`
    pub fn resolve(base: &Path, name: &str, location: Option<&str>) -> Self {
        match location {
            None => Self::File(base.join(name)),
            Some(MEMORY_LOCATION) => Self::Memory,
            Some(dir) => {
                let dir = Path::new(dir);
                if dir.is_absolute() {
                    Self::File(dir.join(name))
                } else {
                    Self::File(base.join(dir).join(name))
                }
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Memory => None,
            Self::File(path) => Some(path),
        }
    }

    /// String form accepted by `ATTACH DATABASE`.
    pub fn attach_target(&self) -> String {
        match self {
            Self::Memory => MEMORY_LOCATION.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Open a connection, creating the parent directory of a file database.
    pub(crate) fn open(&self) -> Result<Connection, EngineError> {
        match self {
            Self::Memory => Ok(Connection::open_in_memory()?),
            Self::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| EngineError::io(parent.display().to_string(), &e))?;
                }
                Ok(Connection::open(path)?)
            }
        }
    }
}
