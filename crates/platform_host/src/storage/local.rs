//! Synchronous local key-value storage contracts and adapters.
//!
//! The browser `localStorage` API is synchronous, string-keyed, and string-valued. This module
//! models that capability directly so callers can read-modify-write a document without awaiting.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Host capability for durable string key-value storage.
///
/// Implementations give no transactional or cross-tab guarantees. Errors are plain strings, the
/// same as the other host contracts.
pub trait LocalStorage {
    /// Returns the raw value stored under `key`, or `None` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, String>;

    /// Overwrites the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the write is rejected (for example, quota exceeded).
    fn set_item(&self, key: &str, value: &str) -> Result<(), String>;

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be modified.
    fn remove_item(&self, key: &str) -> Result<(), String>;

    /// Returns `false` when the host has no durable storage at all.
    fn is_available(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Storage used when the host has no durable storage (non-browser targets, sandboxed frames).
///
/// Reads see an empty store and writes are accepted and dropped.
pub struct NoopLocalStorage;

impl LocalStorage for NoopLocalStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), String> {
        Ok(())
    }

    fn remove_item(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory storage keyed by string. Clones share the same backing map.
pub struct MemoryLocalStorage {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryLocalStorage {
    /// Creates a store pre-seeded with `key = value`.
    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .inner
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl LocalStorage for MemoryLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory storage whose writes can be switched to fail, for exercising write-failure paths.
pub struct FailingLocalStorage {
    memory: MemoryLocalStorage,
    fail_writes: Rc<RefCell<bool>>,
}

impl FailingLocalStorage {
    /// Creates a store that rejects every write with a quota error.
    pub fn rejecting_writes() -> Self {
        let store = Self::default();
        store.set_fail_writes(true);
        store
    }

    /// Toggles write failure.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.borrow_mut() = fail;
    }

    /// Returns the in-memory backing store, for inspecting what was actually written.
    pub fn memory(&self) -> &MemoryLocalStorage {
        &self.memory
    }
}

impl LocalStorage for FailingLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        self.memory.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        if *self.fail_writes.borrow() {
            return Err("QuotaExceededError: storage quota exceeded".to_string());
        }
        self.memory.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        if *self.fail_writes.borrow() {
            return Err("storage is read-only".to_string());
        }
        self.memory.remove_item(key)
    }
}
