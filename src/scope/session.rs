//! Session storage seam.
//!
//! The proxy does not own sessions. A session layer earlier in the stack
//! may attach a [`SessionHandle`] to the request; the locale middleware
//! writes the chosen locale through it when one is present.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

pub trait SessionStore: Send + Sync {
    fn set(&self, key: &str, value: &str);
    fn get(&self, key: &str) -> Option<String>;
}

/// Cloneable request extension pointing at the caller's session.
#[derive(Clone)]
pub struct SessionHandle(pub Arc<dyn SessionStore>);

impl SessionHandle {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self(Arc::new(store))
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionHandle")
    }
}

impl std::ops::Deref for SessionHandle {
    type Target = dyn SessionStore;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// In-process session store, mainly for tests and single-node setups.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock().expect("session mutex poisoned");
        values.insert(key.to_string(), value.to_string());
    }

    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().expect("session mutex poisoned");
        values.get(key).cloned()
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get("locale"), None);
        store.set("locale", "pt");
        assert_eq!(store.get("locale").as_deref(), Some("pt"));
    }

    #[test]
    fn test_handle_shares_store() {
        let store = Arc::new(MemorySessionStore::new());
        let handle = SessionHandle::new(store.clone());
        handle.set("locale", "de");
        assert_eq!(store.get("locale").as_deref(), Some("de"));
    }
}
