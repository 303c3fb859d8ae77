//! Seed manifest models and the host service that fetches them.

pub mod service;
pub mod types;
