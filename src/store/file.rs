//! File-backed shared store living in a group container directory
//!
//! The container directory plays the role of an app group: both processes
//! must be pointed at the same one, and it has to be created (linked) before
//! use. A missing container is a configuration error, never silently created.

use std::{
    collections::BTreeMap,
    fs,
    io::Write as _,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{debug, info, warn};

use super::{SharedStateStore, StoreValue};
use crate::error::WidgetError;

/// File holding the key-value map inside the container
const STORE_FILE: &str = "shared-state.json";

#[derive(Debug)]
pub struct FileStore {
    namespace: String,
    container: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the container `<container_root>/<namespace>` without creating it
    pub fn new(container_root: &Path, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            container: container_root.join(&namespace),
            namespace,
            write_lock: Mutex::new(()),
        }
    }

    pub fn container(&self) -> &Path {
        &self.container
    }

    pub fn path(&self) -> PathBuf {
        self.container.join(STORE_FILE)
    }

    pub fn is_linked(&self) -> bool {
        self.container.is_dir()
    }

    /// Create the container directory so writer and widget share a namespace
    pub fn link(&self) -> Result<&Path, WidgetError> {
        fs::create_dir_all(&self.container).map_err(|e| {
            WidgetError::configuration(
                &self.namespace,
                format!("failed to create {}: {}", self.container.display(), e),
            )
        })?;
        info!("Linked shared namespace at {}", self.container.display());
        Ok(&self.container)
    }

    fn check_linked(&self) -> Result<(), WidgetError> {
        if self.is_linked() {
            Ok(())
        } else {
            Err(WidgetError::configuration(
                &self.namespace,
                format!(
                    "group container {} not found, run `pomodoro-widget link` first",
                    self.container.display()
                ),
            ))
        }
    }

    /// Read the whole map; a missing file is an empty store
    fn load(&self) -> Result<BTreeMap<String, StoreValue>, WidgetError> {
        self.check_linked()?;
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(WidgetError::configuration(
                    &self.namespace,
                    format!("failed to read {}: {}", path.display(), e),
                ))
            }
        };

        match serde_json::from_str(&content) {
            Ok(map) => Ok(map),
            Err(e) => {
                // Treated as stale rather than fatal; the next write replaces it.
                warn!("Ignoring unreadable shared state at {}: {}", path.display(), e);
                Ok(BTreeMap::new())
            }
        }
    }

    /// Temp file + fsync + rename so readers never observe a partial file
    ///
    /// The temp file is removed on any failure before the rename lands.
    fn write_atomic(&self, map: &BTreeMap<String, StoreValue>) -> Result<(), WidgetError> {
        let io_err = |e: std::io::Error| {
            WidgetError::configuration(&self.namespace, format!("failed to write shared state: {}", e))
        };

        let json = serde_json::to_string_pretty(map).map_err(|e| {
            WidgetError::configuration(&self.namespace, format!("failed to encode shared state: {}", e))
        })?;

        let mut temp = tempfile::Builder::new()
            .prefix(STORE_FILE)
            .suffix(".tmp")
            .tempfile_in(&self.container)
            .map_err(io_err)?;
        temp.write_all(json.as_bytes()).map_err(io_err)?;
        temp.as_file().sync_all().map_err(io_err)?;

        temp.persist(self.path()).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl SharedStateStore for FileStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get(&self, key: &str) -> Result<Option<StoreValue>, WidgetError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: StoreValue) -> Result<(), WidgetError> {
        let _guard = self.write_lock.lock().map_err(|e| {
            WidgetError::configuration(&self.namespace, format!("failed to lock store: {}", e))
        })?;

        let mut map = self.load()?;
        debug!("Setting {} = {:?} in {}", key, value, self.namespace);
        map.insert(key.to_string(), value);
        self.write_atomic(&map)
    }

    fn synchronize(&self) -> Result<(), WidgetError> {
        // Each set already renames a fully written file into place.
        self.check_linked()
    }
}
