//! Durable storage capability contracts.

pub mod local;
