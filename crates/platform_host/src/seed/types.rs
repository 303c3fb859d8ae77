//! Seed manifest and build-version models fetched from the hosting site.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
/// Initial filesystem description used to populate an empty desktop.
pub struct SeedManifest {
    /// Folder names created at the filesystem root.
    #[serde(default)]
    pub folders: Vec<String>,
    /// Files placed inside one of the root folders.
    #[serde(default)]
    pub files: Vec<SeedFile>,
}

impl SeedManifest {
    /// Returns `true` when the manifest describes nothing.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One file entry in a [`SeedManifest`].
pub struct SeedFile {
    /// File name.
    pub name: String,
    /// Name of the root folder the file lives in.
    pub folder: String,
    /// MIME type reported to mini-apps.
    pub mime_type: String,
    /// External location the content is resolved from on first open.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Build identity of the hosted site, compared by `sha` to detect a newer deployment.
pub struct VersionDescriptor {
    /// Commit hash of the deployed build.
    pub sha: String,
    /// Build timestamp as reported by the deployment.
    pub build_at: String,
}
