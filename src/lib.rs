//! Minecraft installation and launch library.
//!
//! The crate splits into three layers:
//!
//! - **version**: fetch the Mojang version manifest, parse version
//!   descriptors (modern and legacy schemas), evaluate platform rules and
//!   flatten `inheritsFrom` chains into a self-contained descriptor.
//! - **install**: materialize a version on disk under a `.minecraft`
//!   layout. Libraries, native archives, the asset tree, the logging
//!   config and the client jar are all checksum-verified and idempotent,
//!   so a crashed install is repaired by running it again.
//! - **launch**: turn a resolved descriptor plus a [`LaunchIdentity`] into
//!   the java argv and spawn the game.
//!
//! ```no_run
//! use mc_launcher_core::auth::LaunchIdentity;
//! use mc_launcher_core::install::Installer;
//! use mc_launcher_core::launch::{launch, LaunchOptions};
//!
//! # async fn run() -> mc_launcher_core::error::LauncherResult<()> {
//! let installer = Installer::new("/home/alice/.minecraft")?;
//! let options = LaunchOptions::new(LaunchIdentity::offline("Alice"));
//! let child = launch(&installer, "1.20.4", &options).await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`LaunchIdentity`]: auth::LaunchIdentity

pub mod auth;
pub mod downloader;
pub mod error;
pub mod http;
pub mod install;
pub mod launch;
pub mod maven;
pub mod platform;
pub mod version;

pub use auth::{AuthInjector, Authenticator, LaunchIdentity, OfflineAuthenticator};
pub use downloader::{DownloadEntry, Downloader};
pub use error::{LauncherError, LauncherResult};
pub use install::{default_install_dir, Installer};
pub use launch::{build_command, launch, LaunchCommand, LaunchOptions};
pub use platform::Platform;
pub use version::descriptor::VersionDescriptor;
pub use version::manifest::VersionManifest;
