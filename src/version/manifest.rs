// ─── Version Manifest ───
// Handles fetching and parsing the Mojang version manifest v2.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::error::LauncherResult;

pub const VERSION_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// Top-level Mojang version manifest. Fetched fresh on every call; never
/// cached across process runs.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub latest: LatestPointers,
    pub versions: Vec<VersionSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestPointers {
    pub release: String,
    pub snapshot: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionKind {
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: VersionKind,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(rename = "releaseTime")]
    pub release_time: DateTime<Utc>,
}

impl VersionManifest {
    /// Fetch the version manifest from Mojang using a shared HTTP client.
    pub async fn fetch(client: &reqwest::Client) -> LauncherResult<Self> {
        Self::fetch_from(client, VERSION_MANIFEST_URL).await
    }

    /// Fetch the manifest from an explicit URL (mirrors, tests).
    pub async fn fetch_from(client: &reqwest::Client, url: &str) -> LauncherResult<Self> {
        let manifest: VersionManifest = client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> Option<&VersionSummary> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// List all official stable versions (release only).
    pub fn releases(&self) -> Vec<&VersionSummary> {
        self.versions
            .iter()
            .filter(|v| v.kind == VersionKind::Release)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_manifest() {
        let json = r#"{
            "latest": {"release": "1.20.4", "snapshot": "24w07a"},
            "versions": [
                {
                    "id": "1.20.4",
                    "type": "release",
                    "url": "https://example.com/1.20.4.json",
                    "sha1": "abc123",
                    "releaseTime": "2023-12-07T08:00:00+00:00"
                },
                {
                    "id": "b1.8.1",
                    "type": "old_beta",
                    "url": "https://example.com/b1.8.1.json",
                    "releaseTime": "2011-09-19T22:00:00+00:00"
                }
            ]
        }"#;
        let manifest: VersionManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.latest.release, "1.20.4");

        let entry = manifest.find_version("1.20.4").unwrap();
        assert_eq!(entry.kind, VersionKind::Release);
        assert_eq!(entry.sha1.as_deref(), Some("abc123"));

        assert_eq!(manifest.releases().len(), 1);
        assert!(manifest.find_version("1.99").is_none());
    }
}
