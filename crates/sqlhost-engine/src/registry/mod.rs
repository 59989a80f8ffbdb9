//! Connection registry: logical database names mapped to open connections.

pub mod entry;
pub mod location;
pub mod pragmas;

pub use entry::ConnectionEntry;
pub use location::Location;
pub use pragmas::apply_pragmas;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use sqlhost_core::config::StorageConfig;
use sqlhost_core::errors::{ArgumentError, EngineError, LifecycleError};
use sqlhost_core::types::{FxHashMap, Value};
use sqlhost_core::SqlHostResult;
use tracing::{debug, info, warn};

use crate::pool::lock;

/// SQLite writes these next to a database file.
const SIDECAR_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// At most one live connection per name. Lookups happen when work runs,
/// not when it is submitted.
pub struct ConnectionRegistry {
    storage: StorageConfig,
    base: PathBuf,
    entries: Mutex<FxHashMap<String, Arc<ConnectionEntry>>>,
}

impl ConnectionRegistry {
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            storage: storage.clone(),
            base: storage.effective_base_path(),
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn resolve(&self, name: &str, location: Option<&str>) -> Location {
        Location::resolve(&self.base, name, location)
    }

    /// Open `name` at `location`. Opening an open name is an error.
    pub fn open(&self, name: &str, location: Option<&str>) -> SqlHostResult<Arc<ConnectionEntry>> {
        let mut entries = lock(&self.entries);
        if entries.contains_key(name) {
            return Err(LifecycleError::AlreadyOpen {
                name: name.to_string(),
            }
            .into());
        }

        let location = self.resolve(name, location);
        let conn = location.open()?;
        apply_pragmas(&conn, &self.storage)?;

        let entry = Arc::new(ConnectionEntry::new(name, location, conn));
        entries.insert(name.to_string(), entry.clone());
        debug!(connection = %name, location = ?entry.location(), "connection opened");
        Ok(entry)
    }

    pub fn get(&self, name: &str) -> SqlHostResult<Arc<ConnectionEntry>> {
        lock(&self.entries).get(name).cloned().ok_or_else(|| {
            LifecycleError::NotOpen {
                name: name.to_string(),
            }
            .into()
        })
    }

    pub fn is_open(&self, name: &str) -> bool {
        lock(&self.entries).contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.entries).keys().cloned().collect();
        names.sort();
        names
    }

    /// Close `name`. Closing an unknown name is an error.
    pub fn close(&self, name: &str) -> SqlHostResult<()> {
        let entry = lock(&self.entries).remove(name).ok_or_else(|| LifecycleError::NotOpen {
            name: name.to_string(),
        })?;
        entry.close()?;
        Ok(())
    }

    /// Close every connection and drop all hook registrations. Teardown only.
    pub fn close_all(&self) -> usize {
        let drained: Vec<Arc<ConnectionEntry>> =
            lock(&self.entries).drain().map(|(_, entry)| entry).collect();
        for entry in &drained {
            if let Err(err) = entry.close() {
                warn!(connection = %entry.name(), error = %err, "failed to close connection");
            }
        }
        if !drained.is_empty() {
            info!(closed = drained.len(), "all connections closed");
        }
        drained.len()
    }

    /// Close any live handle for `name`, then delete the database file and
    /// its sidecar files. A missing database file is an error.
    pub fn remove(&self, name: &str, location: Option<&str>) -> SqlHostResult<()> {
        let location = self.resolve(name, location);
        let was_open = self.is_open(name);
        if was_open {
            self.close(name)?;
        }

        let Some(path) = location.path() else {
            // Closing is the only way to delete an in-memory database.
            if was_open {
                return Ok(());
            }
            return Err(ArgumentError::new("delete", "in-memory databases have no file to delete").into());
        };
        if !path.exists() {
            return Err(LifecycleError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        std::fs::remove_file(path).map_err(|e| EngineError::io(path.display().to_string(), &e))?;

        for suffix in SIDECAR_SUFFIXES {
            let mut sidecar = path.as_os_str().to_owned();
            sidecar.push(suffix);
            let sidecar = PathBuf::from(sidecar);
            if sidecar.exists() {
                std::fs::remove_file(&sidecar)
                    .map_err(|e| EngineError::io(sidecar.display().to_string(), &e))?;
            }
        }
        info!(connection = %name, path = %path.display(), "database deleted");
        Ok(())
    }

    /// Attach `other_db_name` (resolved like `open`) to `name` under `alias`.
    pub fn attach(
        &self,
        name: &str,
        other_db_name: &str,
        alias: &str,
        location: Option<&str>,
    ) -> SqlHostResult<()> {
        let entry = self.get(name)?;
        let target = self.resolve(other_db_name, location);
        let params = [Value::Text(target.attach_target()), Value::from(alias)];
        entry.with_conn(|conn| {
            crate::query::execute(conn, "ATTACH DATABASE ?1 AS ?2", &params)?;
            Ok(())
        })?;
        debug!(connection = %name, alias, "database attached");
        Ok(())
    }

    pub fn detach(&self, name: &str, alias: &str) -> SqlHostResult<()> {
        let entry = self.get(name)?;
        entry.with_conn(|conn| {
            crate::query::execute(conn, "DETACH DATABASE ?1", &[Value::from(alias)])?;
            Ok(())
        })?;
        debug!(connection = %name, alias, "database detached");
        Ok(())
    }
}
