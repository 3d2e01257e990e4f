//! In-memory shared store, used by tests and by hosts without a shared container

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use super::{SharedStateStore, StoreValue};
use crate::error::WidgetError;

#[derive(Debug)]
pub struct MemoryStore {
    namespace: String,
    values: Mutex<HashMap<String, StoreValue>>,
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            values: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// A store whose namespace was never linked; every operation fails
    pub fn unavailable(namespace: impl Into<String>) -> Self {
        let store = Self::new(namespace);
        store.set_available(false);
        store
    }

    /// Toggle availability to simulate the namespace appearing or disappearing
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), WidgetError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(WidgetError::configuration(
                &self.namespace,
                "namespace is not linked",
            ))
        }
    }
}

impl SharedStateStore for MemoryStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get(&self, key: &str) -> Result<Option<StoreValue>, WidgetError> {
        self.check_available()?;
        let values = self.values.lock().map_err(|e| {
            WidgetError::configuration(&self.namespace, format!("failed to lock store: {}", e))
        })?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: StoreValue) -> Result<(), WidgetError> {
        self.check_available()?;
        let mut values = self.values.lock().map_err(|e| {
            WidgetError::configuration(&self.namespace, format!("failed to lock store: {}", e))
        })?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_key_returns_none() {
        let store = MemoryStore::new("group.test");
        assert_eq!(store.get("mode").unwrap(), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = MemoryStore::new("group.test");
        store.set("mode", StoreValue::Text("Work".into())).unwrap();
        store.set("mode", StoreValue::Text("Short".into())).unwrap();
        assert_eq!(
            store.get("mode").unwrap(),
            Some(StoreValue::Text("Short".into()))
        );
    }

    #[test]
    fn unavailable_store_reports_configuration_error() {
        let store = MemoryStore::unavailable("group.test");
        let err = store.get("mode").unwrap_err();
        assert_eq!(err.code(), "UNAVAILABLE");
        assert!(store.set("mode", StoreValue::Bool(true)).is_err());
    }
}
