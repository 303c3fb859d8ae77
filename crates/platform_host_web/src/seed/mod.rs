//! Browser seed-source adapters.

pub mod fetch_source;
