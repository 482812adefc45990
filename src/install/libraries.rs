// ─── Library Installer ───
// Walks a resolved descriptor's library list and fetches the artifacts that
// apply to the current platform, including natives classifier jars.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::downloader::Downloader;
use crate::error::LauncherResult;
use crate::platform::Platform;
use crate::version::descriptor::{LibrarySource, VersionDescriptor};

/// Download every applicable library into `libraries_dir`.
///
/// A single library's failure is logged and skipped so partial installs
/// stay launchable; a natives classifier that never arrives surfaces later
/// as a missing-archive failure in the native extractor.
pub async fn install_libraries(
    descriptor: &VersionDescriptor,
    libraries_dir: &Path,
    platform: &Platform,
    downloader: &Downloader,
) -> LauncherResult<()> {
    let mut applicable = 0usize;

    for library in &descriptor.libraries {
        if !library.applies_to(platform) {
            debug!("Skipping library (OS rule): {}", library.name);
            continue;
        }
        applicable += 1;

        // ── Main artifact ──
        match &library.source {
            LibrarySource::Modern { artifact, .. } => {
                if let Some(artifact) = artifact {
                    let dest = libraries_dir.join(&artifact.path);
                    if let Err(err) = downloader
                        .ensure(&artifact.url, &dest, artifact.sha1.as_deref())
                        .await
                    {
                        warn!("Skipping library {}: {}", library.name, err);
                    }
                }
            }
            LibrarySource::Legacy {
                coordinate,
                repository,
            } => {
                // Legacy manifests ship no digest, so presence is the only
                // idempotency signal available.
                let dest = libraries_dir.join(coordinate.local_path());
                if !dest.exists() {
                    if let Err(err) = downloader.ensure(&coordinate.url(repository), &dest, None).await
                    {
                        warn!("Skipping library {}: {}", library.name, err);
                    }
                }
            }
        }

        // ── Natives classifier ──
        if let Some(native) = library.native_artifact(platform) {
            let dest = libraries_dir.join(&native.relative_path);
            if native.sha1.is_none() && dest.exists() {
                continue;
            }
            if let Err(err) = downloader
                .ensure(&native.url, &dest, native.sha1.as_deref())
                .await
            {
                warn!("Failed to fetch natives for {}: {}", library.name, err);
            }
        }
    }

    info!(
        "Processed {} libraries ({} applicable)",
        descriptor.libraries.len(),
        applicable
    );
    Ok(())
}
