use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Install pipeline stage, used to tag fatal installation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    Resolving,
    Libraries,
    Natives,
    Assets,
    LoggingConfig,
    ClientJar,
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallStage::Resolving => "version resolution",
            InstallStage::Libraries => "library installation",
            InstallStage::Natives => "native extraction",
            InstallStage::Assets => "asset installation",
            InstallStage::LoggingConfig => "logging config installation",
            InstallStage::ClientJar => "client jar download",
        };
        f.write_str(name)
    }
}

/// Central error type for the entire launcher core.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    // ── Version metadata ────────────────────────────────
    #[error("Version not found in manifest: {0}")]
    VersionNotFound(String),

    #[error("Version metadata error: {0}")]
    Version(String),

    #[error("Invalid Maven coordinate: {0}")]
    InvalidMavenCoordinate(String),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Install ─────────────────────────────────────────
    #[error("Installation of {version} failed during {stage}: {source}")]
    Installation {
        version: String,
        stage: InstallStage,
        #[source]
        source: Box<LauncherError>,
    },

    #[error("Native library error: {0}")]
    NativeLibrary(String),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── Launch ──────────────────────────────────────────
    #[error("Launch error: {0}")]
    Launch(String),

    // ── Auth ────────────────────────────────────────────
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Two-factor authentication required")]
    TwoFactorRequired,
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl LauncherError {
    /// Wrap a failure with the version and pipeline stage it occurred in.
    pub fn during(self, version: &str, stage: InstallStage) -> Self {
        LauncherError::Installation {
            version: version.to_string(),
            stage,
            source: Box::new(self),
        }
    }
}
