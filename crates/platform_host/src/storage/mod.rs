//! Host storage contracts: raw key-value stores and versioned state envelopes.

pub mod app_state;
pub mod kv;
