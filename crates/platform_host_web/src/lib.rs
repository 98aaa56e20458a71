//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer. Today it provides the
//! `localStorage` adapter behind [`platform_host::LocalStorage`] and the factory the runtime uses
//! to pick a storage backend for the active build.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod storage;

pub use adapters::{
    host_strategy_name, local_storage, selected_host_strategy, HostStrategy, LocalStorageAdapter,
};
pub use storage::web_local_storage::WebLocalStorage;
