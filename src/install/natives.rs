// ─── Native Extractor ───
// Unpacks natives classifier jars into the version's natives directory.
// The directory is fully rebuilt on every call so stale natives from a
// prior version or architecture can never leak into a launch.

use std::io::Cursor;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{LauncherError, LauncherResult};
use crate::platform::{OsName, Platform};
use crate::version::descriptor::VersionDescriptor;

/// Rebuild `versions/<id>/natives` from every applicable library's natives
/// classifier jar. The jars must already be installed by the library
/// installer; a missing archive is a hard `NativeLibrary` failure.
pub async fn extract_natives(
    descriptor: &VersionDescriptor,
    install_dir: &Path,
    version_id: &str,
    platform: &Platform,
) -> LauncherResult<()> {
    let natives_dir = install_dir
        .join("versions")
        .join(version_id)
        .join("natives");

    if natives_dir.exists() {
        tokio::fs::remove_dir_all(&natives_dir)
            .await
            .map_err(|e| LauncherError::Io {
                path: natives_dir.clone(),
                source: e,
            })?;
    }
    tokio::fs::create_dir_all(&natives_dir)
        .await
        .map_err(|e| LauncherError::Io {
            path: natives_dir.clone(),
            source: e,
        })?;

    let libraries_dir = install_dir.join("libraries");
    let mut extracted = 0usize;

    for library in &descriptor.libraries {
        if !library.applies_to(platform) {
            continue;
        }
        let Some(native) = library.native_artifact(platform) else {
            continue;
        };

        let jar_path = libraries_dir.join(&native.relative_path);
        if !jar_path.exists() {
            return Err(LauncherError::NativeLibrary(format!(
                "natives archive missing for {}: {}",
                library.name,
                jar_path.display()
            )));
        }

        let jar_bytes = tokio::fs::read(&jar_path)
            .await
            .map_err(|e| LauncherError::Io {
                path: jar_path.clone(),
                source: e,
            })?;

        let exclude = library
            .extract
            .as_ref()
            .map(|rules| rules.exclude.clone())
            .unwrap_or_default();
        let dest_dir = natives_dir.clone();
        let mark_executable = platform.os != OsName::Windows;

        tokio::task::spawn_blocking(move || {
            extract_archive(jar_bytes, &dest_dir, &exclude, mark_executable)
        })
        .await
        .map_err(|e| LauncherError::NativeLibrary(format!("extraction task failed: {e}")))??;

        debug!("Extracted natives from {}", library.name);
        extracted += 1;
    }

    info!(
        "Natives directory rebuilt with {} archives: {}",
        extracted,
        natives_dir.display()
    );
    Ok(())
}

/// Extract one archive: skip directories, `META-INF`, and excluded
/// prefixes; flatten everything else to its basename. `.jnilib` entries are
/// renamed to `.dylib` (historical macOS naming).
fn extract_archive(
    bytes: Vec<u8>,
    dest_dir: &Path,
    exclude: &[String],
    mark_executable: bool,
) -> LauncherResult<()> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        if name.starts_with("META-INF") {
            continue;
        }
        if exclude.iter().any(|prefix| name.starts_with(prefix.as_str())) {
            continue;
        }

        let Some(basename) = name.rsplit(['/', '\\']).next().filter(|n| !n.is_empty()) else {
            continue;
        };
        let file_name = match basename.strip_suffix(".jnilib") {
            Some(stem) => format!("{stem}.dylib"),
            None => basename.to_string(),
        };

        let dest = dest_dir.join(&file_name);
        let mut out = std::fs::File::create(&dest).map_err(|e| LauncherError::Io {
            path: dest.clone(),
            source: e,
        })?;
        std::io::copy(&mut entry, &mut out).map_err(|e| LauncherError::Io {
            path: dest.clone(),
            source: e,
        })?;
        drop(out);

        if mark_executable {
            make_executable(&dest).map_err(|e| LauncherError::Io {
                path: dest.clone(),
                source: e,
            })?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
