// ─── Install Orchestrator ───
// Sequences resolve → libraries → natives → assets → logging config →
// client jar. Every artifact write is idempotent, so re-running a failed
// install is the recovery path.

pub mod assets;
pub mod libraries;
pub mod natives;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::downloader::Downloader;
use crate::error::{InstallStage, LauncherError, LauncherResult};
use crate::http::build_http_client;
use crate::platform::Platform;
use crate::version::descriptor::VersionDescriptor;
use crate::version::manifest::{VersionManifest, VERSION_MANIFEST_URL};
use crate::version::resolver;

/// The conventional `.minecraft` location for the current platform.
pub fn default_install_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        dirs::data_dir().map(|dir| dir.join(".minecraft"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir().map(|dir| dir.join("minecraft"))
    } else {
        dirs::home_dir().map(|dir| dir.join(".minecraft"))
    }
}

/// Installs game versions into a `.minecraft`-layout directory.
pub struct Installer {
    client: reqwest::Client,
    downloader: Downloader,
    platform: Platform,
    install_dir: PathBuf,
    manifest_url: String,
}

impl Installer {
    pub fn new(install_dir: impl Into<PathBuf>) -> LauncherResult<Self> {
        let client = build_http_client()?;
        Ok(Self {
            downloader: Downloader::with_client(client.clone()),
            client,
            platform: Platform::current(),
            install_dir: install_dir.into(),
            manifest_url: VERSION_MANIFEST_URL.to_string(),
        })
    }

    /// Pin the platform instead of detecting the host (tests, cross-prep).
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Resolve version ids against an alternate manifest (mirrors, tests).
    pub fn with_manifest_url(mut self, url: impl Into<String>) -> Self {
        self.manifest_url = url.into();
        self
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Whether the version's descriptor and client jar are both present.
    pub fn is_installed(&self, version_id: &str) -> bool {
        let version_dir = self.install_dir.join("versions").join(version_id);
        version_dir.join(format!("{version_id}.json")).exists()
            && version_dir.join(format!("{version_id}.jar")).exists()
    }

    /// Install a version and return its merged descriptor.
    pub async fn install(&self, version_id: &str) -> LauncherResult<VersionDescriptor> {
        let mut visited = HashSet::new();
        let merged = self.install_value(version_id, &mut visited).await?;
        resolver::parse_descriptor(&merged)
    }

    /// Resolve a version's merged, inheritance-free descriptor.
    ///
    /// Parents named by `inheritsFrom` are installed in full first — their
    /// libraries and assets are required by the child at runtime.
    pub async fn resolve(&self, version_id: &str) -> LauncherResult<VersionDescriptor> {
        let mut visited = HashSet::new();
        let merged = self.resolve_value(version_id, &mut visited).await?;
        resolver::parse_descriptor(&merged)
    }

    async fn install_value(
        &self,
        version_id: &str,
        visited: &mut HashSet<String>,
    ) -> LauncherResult<Value> {
        info!("Installing version {}", version_id);

        let merged = self
            .resolve_value(version_id, visited)
            .await
            .map_err(|e| e.during(version_id, InstallStage::Resolving))?;
        let descriptor = resolver::parse_descriptor(&merged)
            .map_err(|e| e.during(version_id, InstallStage::Resolving))?;

        libraries::install_libraries(
            &descriptor,
            &self.install_dir.join("libraries"),
            &self.platform,
            &self.downloader,
        )
        .await
        .map_err(|e| e.during(version_id, InstallStage::Libraries))?;

        natives::extract_natives(&descriptor, &self.install_dir, version_id, &self.platform)
            .await
            .map_err(|e| e.during(version_id, InstallStage::Natives))?;

        assets::install_assets(&descriptor, &self.install_dir, &self.downloader)
            .await
            .map_err(|e| e.during(version_id, InstallStage::Assets))?;

        self.install_logging_config(&descriptor)
            .await
            .map_err(|e| e.during(version_id, InstallStage::LoggingConfig))?;

        self.install_client_jar(&descriptor, version_id)
            .await
            .map_err(|e| e.during(version_id, InstallStage::ClientJar))?;

        info!("Version {} installed", version_id);
        Ok(merged)
    }

    async fn resolve_value(
        &self,
        version_id: &str,
        visited: &mut HashSet<String>,
    ) -> LauncherResult<Value> {
        if !visited.insert(version_id.to_string()) {
            return Err(LauncherError::Version(format!(
                "cyclic inheritsFrom chain involving {version_id}"
            )));
        }

        self.ensure_descriptor(version_id).await?;
        let child = resolver::load_local(&self.install_dir, version_id)
            .await?
            .ok_or_else(|| {
                LauncherError::Version(format!("descriptor for {version_id} missing after fetch"))
            })?;

        let Some(parent_id) = child.get("inheritsFrom").and_then(Value::as_str) else {
            return Ok(child);
        };
        let parent_id = parent_id.to_string();
        debug!("Version {} inherits from {}", version_id, parent_id);

        // A broken parent is fatal; the unmerged child alone cannot launch.
        let parent = Box::pin(self.install_value(&parent_id, visited)).await?;
        Ok(resolver::merge_with_parent(&parent, &child))
    }

    /// Make sure `versions/<id>/<id>.json` exists, downloading it from the
    /// fresh manifest when possible. Versions absent from the manifest
    /// (mod-loader children) are accepted from disk.
    async fn ensure_descriptor(&self, version_id: &str) -> LauncherResult<()> {
        let path = resolver::descriptor_path(&self.install_dir, version_id);

        match VersionManifest::fetch_from(&self.client, &self.manifest_url).await {
            Ok(manifest) => {
                if let Some(entry) = manifest.find_version(version_id) {
                    return self
                        .downloader
                        .ensure(&entry.url, &path, entry.sha1.as_deref())
                        .await;
                }
            }
            Err(err) => {
                if path.exists() {
                    warn!("Manifest fetch failed, using local descriptor: {}", err);
                    return Ok(());
                }
                return Err(err);
            }
        }

        if path.exists() {
            debug!("{} not in manifest; using local descriptor", version_id);
            return Ok(());
        }
        Err(LauncherError::VersionNotFound(version_id.to_string()))
    }

    async fn install_client_jar(
        &self,
        descriptor: &VersionDescriptor,
        version_id: &str,
    ) -> LauncherResult<()> {
        let Some(client) = descriptor
            .downloads
            .as_ref()
            .and_then(|downloads| downloads.client.as_ref())
        else {
            debug!("No client download declared for {}", version_id);
            return Ok(());
        };

        let dest = self
            .install_dir
            .join("versions")
            .join(version_id)
            .join(format!("{version_id}.jar"));
        self.downloader
            .ensure(&client.url, &dest, Some(&client.sha1))
            .await
    }

    async fn install_logging_config(&self, descriptor: &VersionDescriptor) -> LauncherResult<()> {
        let Some(file) = descriptor
            .logging
            .as_ref()
            .and_then(|logging| logging.client.as_ref())
            .and_then(|client| client.file.as_ref())
        else {
            return Ok(());
        };

        let dest = self.install_dir.join("assets/log_configs").join(&file.id);
        self.downloader
            .ensure(&file.url, &dest, file.sha1.as_deref())
            .await
    }
}
