// ─── Launch Command Builder ───
// Turns a resolved descriptor into the java argv for the client. Argument
// templates use `${name}` placeholders; anything we cannot fill stays
// verbatim so the game's own defaults apply.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::auth::{AuthInjector, LaunchIdentity};
use crate::error::{LauncherError, LauncherResult};
use crate::platform::{OsName, Platform};
use crate::version::descriptor::VersionDescriptor;

/// Caller-supplied knobs for command construction.
pub struct LaunchOptions {
    pub identity: LaunchIdentity,
    /// Explicit java executable; defaults to `java` on the PATH.
    pub java_path: Option<PathBuf>,
    /// JVM flags inserted before the library-path and classpath flags.
    pub jvm_args: Vec<String>,
    /// Game arguments appended after the descriptor's own.
    pub extra_game_args: Vec<String>,
    /// Extra `${name}` substitutions; these win over the built-in table.
    pub placeholders: HashMap<String, String>,
    pub injector: Option<AuthInjector>,
}

impl LaunchOptions {
    pub fn new(identity: LaunchIdentity) -> Self {
        Self {
            identity,
            java_path: None,
            jvm_args: Vec::new(),
            extra_game_args: Vec::new(),
            placeholders: HashMap::new(),
            injector: None,
        }
    }
}

/// A fully substituted argv, ready to spawn.
#[derive(Debug, Clone)]
pub struct LaunchCommand {
    argv: Vec<String>,
}

impl LaunchCommand {
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn into_vec(self) -> Vec<String> {
        self.argv
    }

    pub fn to_command(&self, working_dir: &Path) -> std::process::Command {
        let mut command = std::process::Command::new(self.program());
        command.args(self.args()).current_dir(working_dir);
        command
    }
}

/// Build the java invocation for an installed, resolved version.
pub fn build_command(
    descriptor: &VersionDescriptor,
    version_id: &str,
    install_dir: &Path,
    platform: &Platform,
    options: &LaunchOptions,
) -> LauncherResult<LaunchCommand> {
    let mut argv = Vec::new();

    argv.push(
        options
            .java_path
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_else(|| "java".to_string()),
    );

    // AWT must run on the first thread on macOS.
    if platform.os == OsName::Osx {
        argv.push("-XstartOnFirstThread".to_string());
    }

    argv.extend(options.jvm_args.iter().cloned());

    if let Some(injector) = &options.injector {
        argv.push(format!(
            "-javaagent:{}={}",
            injector.agent_jar.display(),
            injector.provider_host
        ));
    }

    let natives_dir = install_dir
        .join("versions")
        .join(version_id)
        .join("natives");
    argv.push(format!("-Djava.library.path={}", natives_dir.display()));

    argv.push("-cp".to_string());
    argv.push(build_classpath(descriptor, version_id, install_dir, platform));

    let main_class = descriptor
        .main_class
        .as_deref()
        .ok_or_else(|| LauncherError::Launch(format!("{version_id} declares no mainClass")))?;
    argv.push(main_class.to_string());

    let vars = substitution_table(descriptor, version_id, install_dir, options);
    for token in descriptor.game_argument_tokens(platform) {
        argv.push(substitute(&token, &vars));
    }
    for token in &options.extra_game_args {
        argv.push(substitute(token, &vars));
    }

    Ok(LaunchCommand { argv })
}

/// Rule-filtered library jars plus the client jar last, joined with the
/// platform's separator. Duplicate paths keep their first position.
fn build_classpath(
    descriptor: &VersionDescriptor,
    version_id: &str,
    install_dir: &Path,
    platform: &Platform,
) -> String {
    let libraries_dir = install_dir.join("libraries");
    let mut seen = std::collections::HashSet::new();
    let mut entries: Vec<String> = Vec::new();

    for library in &descriptor.libraries {
        if !library.applies_to(platform) {
            continue;
        }
        let Some(relative) = library.artifact_relative_path() else {
            continue;
        };
        let path = libraries_dir.join(relative).display().to_string();
        if seen.insert(path.clone()) {
            entries.push(path);
        }
    }

    entries.push(
        install_dir
            .join("versions")
            .join(version_id)
            .join(format!("{version_id}.jar"))
            .display()
            .to_string(),
    );

    entries.join(platform.classpath_separator())
}

fn substitution_table(
    descriptor: &VersionDescriptor,
    version_id: &str,
    install_dir: &Path,
    options: &LaunchOptions,
) -> HashMap<String, String> {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert(
        "auth_player_name".into(),
        options.identity.username.clone(),
    );
    vars.insert("auth_uuid".into(), options.identity.uuid.clone());
    vars.insert(
        "auth_access_token".into(),
        options.identity.access_token.clone(),
    );
    vars.insert("version_name".into(), version_id.to_string());
    vars.insert(
        "game_directory".into(),
        install_dir.display().to_string(),
    );
    vars.insert(
        "assets_root".into(),
        install_dir.join("assets").display().to_string(),
    );
    vars.insert(
        "assets_index_name".into(),
        descriptor.asset_index_name(version_id),
    );
    vars.insert("user_type".into(), "msa".to_string());
    vars.insert(
        "version_type".into(),
        descriptor
            .release_type
            .clone()
            .unwrap_or_else(|| "release".to_string()),
    );

    for (key, value) in &options.placeholders {
        vars.insert(key.clone(), value.clone());
    }
    vars
}

/// Replace every `${name}` whose name is in `vars`; unknown placeholders
/// pass through untouched.
fn substitute(token: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(token.len());
    let mut rest = token;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}
