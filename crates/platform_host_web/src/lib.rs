//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer: a `localStorage` key-value store
//! for the filesystem and session blobs, and a `fetch`-backed seed source for the startup
//! manifest and deployed version descriptor.
//!
//! Bridge bindings live under `bridge/`, with `bridge::interop` holding the wasm/non-wasm
//! transport split.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod adapters;
mod bridge;
pub mod seed;
pub mod storage;

pub use adapters::{
    build_host_services, host_strategy_name, key_value_store, seed_source, selected_host_strategy,
};
pub use seed::fetch_source::{WebSeedSource, DEFAULT_MANIFEST_URL, DEFAULT_VERSION_URL};
pub use storage::local_kv::WebKeyValueStore;
