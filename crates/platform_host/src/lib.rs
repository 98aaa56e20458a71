//! Typed host-domain contracts shared by the portal runtime and browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the synchronous
//! local storage capability and time helpers, while the concrete browser adapter lives in
//! `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod time;

pub use storage::local::{FailingLocalStorage, LocalStorage, MemoryLocalStorage, NoopLocalStorage};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
