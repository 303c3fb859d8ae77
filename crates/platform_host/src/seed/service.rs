//! Seed source service contracts.

use std::{future::Future, pin::Pin};

use super::types::{SeedManifest, VersionDescriptor};

/// Object-safe boxed future used by [`SeedSource`] async methods.
pub type SeedSourceFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service that fetches the seed manifest and the deployed build version.
pub trait SeedSource {
    /// Fetches the seed manifest.
    fn fetch_manifest<'a>(&'a self) -> SeedSourceFuture<'a, Result<SeedManifest, String>>;

    /// Fetches the deployed build version descriptor.
    fn fetch_version<'a>(&'a self) -> SeedSourceFuture<'a, Result<VersionDescriptor, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Seed source for unsupported targets. Every fetch fails.
pub struct NoopSeedSource;

impl NoopSeedSource {
    fn unsupported_error(op: &str) -> String {
        format!("seed source unavailable: {op}")
    }
}

impl SeedSource for NoopSeedSource {
    fn fetch_manifest<'a>(&'a self) -> SeedSourceFuture<'a, Result<SeedManifest, String>> {
        Box::pin(async { Err(Self::unsupported_error("fetch_manifest")) })
    }

    fn fetch_version<'a>(&'a self) -> SeedSourceFuture<'a, Result<VersionDescriptor, String>> {
        Box::pin(async { Err(Self::unsupported_error("fetch_version")) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Seed source that serves a fixed manifest and version, used for embedded builds and tests.
pub struct StaticSeedSource {
    manifest: SeedManifest,
    version: Option<VersionDescriptor>,
}

impl StaticSeedSource {
    /// Creates a source serving `manifest` with no version descriptor.
    pub fn new(manifest: SeedManifest) -> Self {
        Self {
            manifest,
            version: None,
        }
    }

    /// Attaches a version descriptor to serve from [`SeedSource::fetch_version`].
    pub fn with_version(mut self, version: VersionDescriptor) -> Self {
        self.version = Some(version);
        self
    }
}

impl SeedSource for StaticSeedSource {
    fn fetch_manifest<'a>(&'a self) -> SeedSourceFuture<'a, Result<SeedManifest, String>> {
        Box::pin(async move { Ok(self.manifest.clone()) })
    }

    fn fetch_version<'a>(&'a self) -> SeedSourceFuture<'a, Result<VersionDescriptor, String>> {
        Box::pin(async move {
            self.version
                .clone()
                .ok_or_else(|| "no version descriptor configured".to_string())
        })
    }
}
