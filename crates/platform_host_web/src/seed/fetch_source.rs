//! `fetch`-backed seed source implementation.

use platform_host::{SeedManifest, SeedSource, SeedSourceFuture, VersionDescriptor};
use serde::de::DeserializeOwned;

/// Default URL of the seed manifest on the hosting site.
pub const DEFAULT_MANIFEST_URL: &str = "/seed/manifest.json";
/// Default URL of the deployed build version descriptor.
pub const DEFAULT_VERSION_URL: &str = "/version.json";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Browser seed source that fetches JSON documents from the hosting site.
pub struct WebSeedSource {
    manifest_url: String,
    version_url: String,
}

impl Default for WebSeedSource {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST_URL, DEFAULT_VERSION_URL)
    }
}

impl WebSeedSource {
    /// Creates a source reading the manifest and version descriptor from the given URLs.
    pub fn new(manifest_url: impl Into<String>, version_url: impl Into<String>) -> Self {
        Self {
            manifest_url: manifest_url.into(),
            version_url: version_url.into(),
        }
    }

    /// Returns the configured manifest URL.
    pub fn manifest_url(&self) -> &str {
        &self.manifest_url
    }

    /// Returns the configured version descriptor URL.
    pub fn version_url(&self) -> &str {
        &self.version_url
    }
}

async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let body = crate::bridge::fetch_text(url).await?;
    serde_json::from_str(&body).map_err(|e| format!("decode {url} failed: {e}"))
}

impl SeedSource for WebSeedSource {
    fn fetch_manifest<'a>(&'a self) -> SeedSourceFuture<'a, Result<SeedManifest, String>> {
        Box::pin(async move { fetch_json(&self.manifest_url).await })
    }

    fn fetch_version<'a>(&'a self) -> SeedSourceFuture<'a, Result<VersionDescriptor, String>> {
        Box::pin(async move { fetch_json(&self.version_url).await })
    }
}
