//! Key-value persistence for settings and the high score
//!
//! Backends:
//! - [`MemoryStore`]: per-session map, always available
//! - [`JsonFileStore`]: one JSON object on disk (native)
//! - [`LocalStorage`]: browser LocalStorage (wasm32)
//!
//! Wrap a real backend in [`FallbackStore`] so a failing store never
//! interrupts play.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No backing store in this environment
    Unavailable,
    /// The backend refused a read or write
    Io(String),
    /// A stored value could not be (de)serialized
    Format(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Io(e) => write!(f, "storage i/o error: {e}"),
            Self::Format(e) => write!(f, "stored value malformed: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Read and decode a JSON value
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StoreError::Format(e.to_string())),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(store: &mut impl KeyValueStore, key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string(value).map_err(|e| StoreError::Format(e.to_string()))?;
    store.set(key, &json)
}

/// In-memory store; contents last for the session only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Mirrors every write in memory and serves from memory when `inner` fails.
///
/// Never returns an error; failures are logged and absorbed.
#[derive(Debug, Clone, Default)]
pub struct FallbackStore<S> {
    inner: S,
    memory: MemoryStore,
}

impl<S: KeyValueStore> FallbackStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            memory: MemoryStore::new(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: KeyValueStore> KeyValueStore for FallbackStore<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.inner.get(key) {
            Ok(value) => Ok(value),
            Err(e) => {
                log::warn!("Reading {key} failed ({e}), using session copy");
                self.memory.get(key)
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.memory.set(key, value)?;
        if let Err(e) = self.inner.set(key, value) {
            log::warn!("Writing {key} failed ({e}), keeping it for this session only");
        }
        Ok(())
    }
}

/// A backend that is never there
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl KeyValueStore for Unavailable {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_fallback_absorbs_failures() {
        let mut store = FallbackStore::new(Unavailable);
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_fallback_prefers_backend() {
        let mut backend = MemoryStore::new();
        backend.set("k", "disk").unwrap();
        let mut store = FallbackStore::new(backend);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("disk"));
        store.set("k", "new").unwrap();
        assert_eq!(store.inner().get("k").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_json_helpers() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "n", &vec![1u32, 2, 3]).unwrap();
        let back: Option<Vec<u32>> = load_json(&store, "n").unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));

        store.set("bad", "{not json").unwrap();
        let err = load_json::<Vec<u32>>(&store, "bad").unwrap_err();
        assert!(matches!(err, StoreError::Format(_)));
        assert!(err.to_string().starts_with("stored value malformed"));
    }
}
