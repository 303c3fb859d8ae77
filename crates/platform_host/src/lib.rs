//! Typed host-domain contracts and shared models used across the desktop runtime and browser
//! adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the key-value storage
//! contract the desktop core persists through, the versioned envelope used for the session blob,
//! the seed-source contract for the startup manifest, and time helpers. Concrete browser adapters
//! live in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod host;
pub mod seed;
pub mod storage;
pub mod time;

pub use host::{HostServices, HostStrategy};
pub use seed::service::{NoopSeedSource, SeedSource, SeedSourceFuture, StaticSeedSource};
pub use seed::types::{SeedFile, SeedManifest, VersionDescriptor};
pub use storage::app_state::{
    build_app_state_envelope, load_app_state_with_migration, migrate_envelope_payload,
    save_app_state_with, AppStateEnvelope, APP_STATE_ENVELOPE_VERSION, DESKTOP_STATE_NAMESPACE,
};
pub use storage::kv::{
    load_json_with, save_json_with, KeyValueStore, MemoryKeyValueStore, NoopKeyValueStore,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
