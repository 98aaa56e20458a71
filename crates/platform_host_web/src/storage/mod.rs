//! Browser storage adapters.

pub mod web_local_storage;
