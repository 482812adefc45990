// ─── Launch ───
// Install-if-needed, resolve, build argv, spawn.

pub mod command;

pub use command::{build_command, LaunchCommand, LaunchOptions};

use std::path::Path;
use std::process::{Child, Stdio};

use tracing::info;

use crate::error::{LauncherError, LauncherResult};
use crate::install::Installer;

/// Launch a version, installing it first when anything is missing.
pub async fn launch(
    installer: &Installer,
    version_id: &str,
    options: &LaunchOptions,
) -> LauncherResult<Child> {
    let descriptor = if installer.is_installed(version_id) {
        installer.resolve(version_id).await?
    } else {
        installer.install(version_id).await?
    };

    let command = build_command(
        &descriptor,
        version_id,
        installer.install_dir(),
        installer.platform(),
        options,
    )?;
    spawn(&command, installer.install_dir())
}

/// Spawn the built command with the game directory as its working directory.
pub fn spawn(command: &LaunchCommand, working_dir: &Path) -> LauncherResult<Child> {
    info!("Launching: {}", command.argv().join(" "));
    command
        .to_command(working_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| LauncherError::Launch(format!("failed to spawn java: {err}")))
}
