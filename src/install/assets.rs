// ─── Asset Installer ───
// Content-addressed asset store: the hash is both the storage key and the
// integrity check.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::downloader::{DownloadEntry, Downloader};
use crate::error::{LauncherError, LauncherResult};
use crate::version::descriptor::VersionDescriptor;

pub const RESOURCES_URL: &str = "https://resources.download.minecraft.net";

/// Top-level asset index JSON structure.
#[derive(Debug, Deserialize)]
pub struct AssetIndex {
    pub objects: HashMap<String, AssetObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    pub size: u64,
}

/// Fetch the asset index and every referenced object.
///
/// The index itself is mandatory — its failure aborts the install. Object
/// fetches run as an idempotent batch; individual failures are logged and
/// do not abort the others.
pub async fn install_assets(
    descriptor: &VersionDescriptor,
    install_dir: &Path,
    downloader: &Downloader,
) -> LauncherResult<()> {
    let Some(index_ref) = &descriptor.asset_index else {
        debug!("Descriptor has no asset index; nothing to install");
        return Ok(());
    };

    let assets_dir = install_dir.join("assets");
    let index_path = assets_dir
        .join("indexes")
        .join(format!("{}.json", index_ref.id));
    downloader
        .ensure(&index_ref.url, &index_path, index_ref.sha1.as_deref())
        .await?;

    let raw = tokio::fs::read_to_string(&index_path)
        .await
        .map_err(|e| LauncherError::Io {
            path: index_path.clone(),
            source: e,
        })?;
    let index: AssetIndex = serde_json::from_str(&raw)?;

    let objects_dir = assets_dir.join("objects");
    let entries = object_download_entries(&index, &objects_dir).await;

    info!(
        "Asset index {}: {} objects, {} to download",
        index_ref.id,
        index.objects.len(),
        entries.len()
    );

    let failures = downloader.download_batch(entries).await;
    if !failures.is_empty() {
        warn!("{} asset downloads failed", failures.len());
    }

    Ok(())
}

/// Build download entries for an asset index, de-duplicated by hash.
///
/// Many logical paths share one physical object; each unique hash is
/// fetched at most once. An object already on disk with the expected size
/// is skipped (documented fast-path; the full hash is verified whenever a
/// download actually happens).
pub async fn object_download_entries(index: &AssetIndex, objects_dir: &Path) -> Vec<DownloadEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for object in index.objects.values() {
        if object.hash.len() < 2 {
            warn!("Ignoring malformed asset hash: {:?}", object.hash);
            continue;
        }
        if !seen.insert(object.hash.clone()) {
            continue;
        }

        let prefix = &object.hash[..2];
        let dest = objects_dir.join(prefix).join(&object.hash);
        if let Ok(meta) = tokio::fs::metadata(&dest).await {
            if meta.len() == object.size {
                continue;
            }
        }

        entries.push(DownloadEntry {
            url: format!("{RESOURCES_URL}/{prefix}/{}", object.hash),
            dest,
            sha1: Some(object.hash.clone()),
            size: Some(object.size),
        });
    }

    entries
}
