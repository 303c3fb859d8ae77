//! Synchronous key-value storage contracts and adapters.
//!
//! The desktop core persists write-through at the end of every mutation, so this contract is
//! synchronous at the call site. Browser adapters map it onto `window.localStorage`.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Host service for raw string values stored per key.
pub trait KeyValueStore {
    /// Loads the raw string stored under `key`.
    fn load_raw(&self, key: &str) -> Result<Option<String>, String>;

    /// Replaces the raw string stored under `key`.
    fn save_raw(&self, key: &str, raw: &str) -> Result<(), String>;

    /// Deletes `key`. Deleting a missing key succeeds.
    fn delete_raw(&self, key: &str) -> Result<(), String>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn load_raw(&self, key: &str) -> Result<Option<String>, String> {
        (**self).load_raw(key)
    }

    fn save_raw(&self, key: &str, raw: &str) -> Result<(), String> {
        (**self).save_raw(key, raw)
    }

    fn delete_raw(&self, key: &str) -> Result<(), String> {
        (**self).delete_raw(key)
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op store for unsupported targets. Reads are always empty and writes are dropped.
pub struct NoopKeyValueStore;

impl KeyValueStore for NoopKeyValueStore {
    fn load_raw(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn save_raw(&self, _key: &str, _raw: &str) -> Result<(), String> {
        Ok(())
    }

    fn delete_raw(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string.
///
/// Clones share the same backing map, which lets tests keep a handle to inspect what a
/// component persisted or to reload a fresh component from the same data.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn save_raw(&self, key: &str, raw: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and deserializes a typed JSON value through a [`KeyValueStore`].
///
/// # Errors
///
/// Returns an error when the store read or JSON deserialization fails.
pub fn load_json_with<S: KeyValueStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_raw(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed JSON value through a [`KeyValueStore`].
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_json_with<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_raw(key, &raw)
}
