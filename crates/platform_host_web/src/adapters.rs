use platform_host::{LocalStorage, MemoryLocalStorage};

use crate::WebLocalStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `platform_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters from `platform_host_web`.
    Browser,
    /// Session-scoped in-memory adapters used for demos and browser test runs.
    Memory,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "memory-host")]
    {
        HostStrategy::Memory
    }

    #[cfg(not(feature = "memory-host"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::Memory => "memory",
    }
}

/// Adapter enum that erases the concrete key-value backend behind [`LocalStorage`].
#[derive(Debug, Clone)]
pub enum LocalStorageAdapter {
    /// Browser `localStorage`.
    Browser(WebLocalStorage),
    /// In-memory store that forgets everything on reload.
    Memory(MemoryLocalStorage),
}

impl LocalStorage for LocalStorageAdapter {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        match self {
            Self::Browser(store) => store.get_item(key),
            Self::Memory(store) => store.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.set_item(key, value),
            Self::Memory(store) => store.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.remove_item(key),
            Self::Memory(store) => store.remove_item(key),
        }
    }

    fn is_available(&self) -> bool {
        match self {
            Self::Browser(store) => store.is_available(),
            Self::Memory(store) => store.is_available(),
        }
    }
}

/// Builds the local storage adapter for the selected host strategy.
pub fn local_storage() -> LocalStorageAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => LocalStorageAdapter::Browser(WebLocalStorage),
        HostStrategy::Memory => LocalStorageAdapter::Memory(MemoryLocalStorage::default()),
    }
}
