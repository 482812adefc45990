// ─── Version Descriptor ───
// Serde model for the per-version JSON document. The two schema generations
// (legacy constructed-URL libraries / `minecraftArguments` strings vs.
// modern `downloads` blocks / conditional argument lists) are resolved into
// sum types once at parse time.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::LauncherError;
use crate::maven::{MavenArtifact, LIBRARIES_BASE_URL};
use crate::platform::Platform;

use super::rules::{rules_allow, Rule};

/// A fully parsed version JSON. After inheritance resolution the
/// `inherits_from` field is always `None`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDescriptor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub inherits_from: Option<String>,
    #[serde(default)]
    pub main_class: Option<String>,
    #[serde(default)]
    pub libraries: Vec<Library>,
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexRef>,
    /// Asset-index id fallback used by older descriptors.
    #[serde(default)]
    pub assets: Option<String>,
    #[serde(default)]
    pub logging: Option<Logging>,
    #[serde(default)]
    pub arguments: Option<Arguments>,
    /// Legacy whitespace-separated argument string (pre-1.13).
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
    #[serde(default)]
    pub java_version: Option<JavaVersionRef>,
    #[serde(rename = "type", default)]
    pub release_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VersionDownloads {
    pub client: Option<DownloadArtifact>,
    #[serde(default)]
    pub server: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    pub sha1: String,
    #[serde(default)]
    pub size: Option<u64>,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexRef {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub total_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Logging {
    #[serde(default)]
    pub client: Option<LoggingClient>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingClient {
    #[serde(default)]
    pub argument: Option<String>,
    #[serde(default)]
    pub file: Option<LoggingFile>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingFile {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaVersionRef {
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub major_version: Option<u32>,
}

// ─── Arguments ───

#[derive(Debug, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<GameArgument>,
    #[serde(default)]
    pub jvm: Vec<GameArgument>,
}

/// One element of a modern argument list: either a plain token or a
/// conditional group carrying its own rules.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GameArgument {
    Plain(String),
    Conditional {
        #[serde(default)]
        rules: Vec<Rule>,
        value: ArgumentValue,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Single(String),
    Multiple(Vec<String>),
}

impl GameArgument {
    /// Tokens this element contributes on the given platform.
    pub fn resolve(&self, platform: &Platform) -> Vec<String> {
        match self {
            GameArgument::Plain(token) => vec![token.clone()],
            GameArgument::Conditional { rules, value } => {
                if !rules.is_empty() && !rules_allow(rules, platform) {
                    return Vec::new();
                }
                match value {
                    ArgumentValue::Single(token) => vec![token.clone()],
                    ArgumentValue::Multiple(tokens) => tokens.clone(),
                }
            }
        }
    }
}

// ─── Libraries ───

#[derive(Debug, Deserialize)]
struct RawLibrary {
    name: String,
    #[serde(default)]
    rules: Option<Vec<Rule>>,
    #[serde(default)]
    downloads: Option<RawLibraryDownloads>,
    #[serde(default)]
    natives: Option<HashMap<String, String>>,
    #[serde(default)]
    extract: Option<ExtractRules>,
    /// Legacy per-library repository base.
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLibraryDownloads {
    #[serde(default)]
    artifact: Option<LibraryArtifact>,
    #[serde(default)]
    classifiers: Option<HashMap<String, LibraryArtifact>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryArtifact {
    pub path: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRules {
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Which download schema a library entry uses, decided once at parse time.
#[derive(Debug, Clone)]
pub enum LibrarySource {
    /// Modern schema: explicit artifact/classifier URLs with SHA-1 digests.
    Modern {
        artifact: Option<LibraryArtifact>,
        classifiers: HashMap<String, LibraryArtifact>,
    },
    /// Legacy schema: Maven-style URL constructed from the coordinate.
    /// Old manifests provide no checksum for these.
    Legacy {
        coordinate: MavenArtifact,
        repository: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(try_from = "RawLibrary")]
pub struct Library {
    pub name: String,
    pub rules: Option<Vec<Rule>>,
    pub natives: Option<HashMap<String, String>>,
    pub extract: Option<ExtractRules>,
    pub source: LibrarySource,
}

impl TryFrom<RawLibrary> for Library {
    type Error = LauncherError;

    fn try_from(raw: RawLibrary) -> Result<Self, Self::Error> {
        let source = match raw.downloads {
            Some(downloads) => LibrarySource::Modern {
                artifact: downloads.artifact,
                classifiers: downloads.classifiers.unwrap_or_default(),
            },
            None => LibrarySource::Legacy {
                coordinate: MavenArtifact::parse(&raw.name)?,
                repository: raw.url.unwrap_or_else(|| LIBRARIES_BASE_URL.to_string()),
            },
        };

        Ok(Library {
            name: raw.name,
            rules: raw.rules,
            natives: raw.natives,
            extract: raw.extract,
            source,
        })
    }
}

/// Resolved natives jar for a library on a specific platform.
#[derive(Debug, Clone)]
pub struct NativeArtifact {
    pub url: String,
    pub sha1: Option<String>,
    /// Path relative to the libraries directory.
    pub relative_path: PathBuf,
}

impl Library {
    /// Whether this library applies to the given platform.
    /// Absent rules mean unconditional inclusion.
    pub fn applies_to(&self, platform: &Platform) -> bool {
        match &self.rules {
            None => true,
            Some(rules) => rules_allow(rules, platform),
        }
    }

    /// The legacy `natives` classifier key for this platform, with `${arch}`
    /// substituted by the host bitness.
    fn natives_key(&self, platform: &Platform) -> Option<String> {
        self.natives
            .as_ref()?
            .get(platform.os.manifest_name())
            .map(|template| template.replace("${arch}", platform.bits()))
    }

    /// Main artifact location relative to the libraries directory, if the
    /// entry has one (some modern entries are natives-only).
    pub fn artifact_relative_path(&self) -> Option<PathBuf> {
        match &self.source {
            LibrarySource::Modern { artifact, .. } => {
                artifact.as_ref().map(|a| PathBuf::from(&a.path))
            }
            LibrarySource::Legacy { coordinate, .. } => Some(coordinate.local_path()),
        }
    }

    /// Resolve the platform's natives classifier jar, if this library
    /// declares one.
    ///
    /// Modern entries are looked up in the `classifiers` map. Arch-qualified
    /// platform keys are tried first — the `natives` template on
    /// classifier-era descriptors names the generic key, and an arm64 host
    /// must not pick a generic jar over an arm64 one. The template key comes
    /// next, then the generic platform keys. Legacy entries construct a
    /// classifier-suffixed Maven URL (without a checksum, as upstream
    /// provides none).
    pub fn native_artifact(&self, platform: &Platform) -> Option<NativeArtifact> {
        match &self.source {
            LibrarySource::Modern { classifiers, .. } => {
                if classifiers.is_empty() {
                    return None;
                }
                let mut candidates = platform.arch_native_classifier_candidates();
                if let Some(key) = self.natives_key(platform) {
                    candidates.push(key);
                }
                candidates.extend(platform.native_classifier_candidates());

                candidates.iter().find_map(|key| {
                    classifiers.get(key).map(|artifact| NativeArtifact {
                        url: artifact.url.clone(),
                        sha1: artifact.sha1.clone(),
                        relative_path: PathBuf::from(&artifact.path),
                    })
                })
            }
            LibrarySource::Legacy {
                coordinate,
                repository,
            } => {
                let key = self.natives_key(platform)?;
                let natives = coordinate.with_classifier(&key);
                Some(NativeArtifact {
                    url: natives.url(repository),
                    sha1: None,
                    relative_path: natives.local_path(),
                })
            }
        }
    }
}

impl VersionDescriptor {
    /// Raw (unsubstituted) game argument tokens for the given platform,
    /// handling both the modern conditional list and the legacy string.
    pub fn game_argument_tokens(&self, platform: &Platform) -> Vec<String> {
        if let Some(arguments) = &self.arguments {
            return arguments
                .game
                .iter()
                .flat_map(|arg| arg.resolve(platform))
                .collect();
        }

        match &self.minecraft_arguments {
            Some(legacy) => legacy.split_whitespace().map(str::to_string).collect(),
            None => Vec::new(),
        }
    }

    /// The asset index id, falling back to the version id when the
    /// descriptor carries neither `assets` nor an `assetIndex`.
    pub fn asset_index_name(&self, version_id: &str) -> String {
        self.assets
            .clone()
            .or_else(|| self.asset_index.as_ref().map(|index| index.id.clone()))
            .unwrap_or_else(|| version_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Arch, OsName};

    fn linux() -> Platform {
        Platform {
            os: OsName::Linux,
            arch: Arch::X86_64,
        }
    }

    #[test]
    fn modern_library_resolves_artifact_and_classifier() {
        let lib: Library = serde_json::from_value(serde_json::json!({
            "name": "org.lwjgl:lwjgl:3.3.3",
            "downloads": {
                "artifact": {
                    "path": "org/lwjgl/lwjgl/3.3.3/lwjgl-3.3.3.jar",
                    "sha1": "aaaa",
                    "size": 1024,
                    "url": "https://libraries.minecraft.net/org/lwjgl/lwjgl/3.3.3/lwjgl-3.3.3.jar"
                },
                "classifiers": {
                    "natives-linux": {
                        "path": "org/lwjgl/lwjgl/3.3.3/lwjgl-3.3.3-natives-linux.jar",
                        "sha1": "bbbb",
                        "size": 2048,
                        "url": "https://libraries.minecraft.net/org/lwjgl/lwjgl/3.3.3/lwjgl-3.3.3-natives-linux.jar"
                    }
                }
            },
            "natives": {"linux": "natives-linux"}
        }))
        .unwrap();

        assert!(matches!(lib.source, LibrarySource::Modern { .. }));
        assert_eq!(
            lib.artifact_relative_path().unwrap(),
            PathBuf::from("org/lwjgl/lwjgl/3.3.3/lwjgl-3.3.3.jar")
        );

        let native = lib.native_artifact(&linux()).unwrap();
        assert_eq!(native.sha1.as_deref(), Some("bbbb"));
        assert!(native.url.ends_with("natives-linux.jar"));
    }

    #[test]
    fn arm64_classifier_beats_natives_template_key() {
        // Classifier-era descriptors name the generic key in `natives`; an
        // arm64 host must still get the arm64 jar when one is published.
        let lib: Library = serde_json::from_value(serde_json::json!({
            "name": "org.lwjgl:lwjgl:3.2.2",
            "downloads": {
                "classifiers": {
                    "natives-macos": {
                        "path": "org/lwjgl/lwjgl/3.2.2/lwjgl-3.2.2-natives-macos.jar",
                        "sha1": "cccc",
                        "size": 2048,
                        "url": "https://libraries.minecraft.net/org/lwjgl/lwjgl/3.2.2/lwjgl-3.2.2-natives-macos.jar"
                    },
                    "natives-macos-arm64": {
                        "path": "org/lwjgl/lwjgl/3.2.2/lwjgl-3.2.2-natives-macos-arm64.jar",
                        "sha1": "dddd",
                        "size": 2048,
                        "url": "https://libraries.minecraft.net/org/lwjgl/lwjgl/3.2.2/lwjgl-3.2.2-natives-macos-arm64.jar"
                    }
                }
            },
            "natives": {"osx": "natives-macos"}
        }))
        .unwrap();

        let arm_mac = Platform {
            os: OsName::Osx,
            arch: Arch::Aarch64,
        };
        let native = lib.native_artifact(&arm_mac).unwrap();
        assert_eq!(native.sha1.as_deref(), Some("dddd"));
        assert!(native.url.ends_with("natives-macos-arm64.jar"));

        // An x86_64 host keeps following the template.
        let intel_mac = Platform {
            os: OsName::Osx,
            arch: Arch::X86_64,
        };
        let native = lib.native_artifact(&intel_mac).unwrap();
        assert_eq!(native.sha1.as_deref(), Some("cccc"));
    }

    #[test]
    fn legacy_library_constructs_maven_url() {
        let lib: Library = serde_json::from_value(serde_json::json!({
            "name": "org.lwjgl.lwjgl:lwjgl:2.9.0",
            "natives": {"linux": "natives-linux-${arch}"}
        }))
        .unwrap();

        assert!(matches!(lib.source, LibrarySource::Legacy { .. }));
        assert_eq!(
            lib.artifact_relative_path().unwrap(),
            PathBuf::from("org/lwjgl/lwjgl/lwjgl/2.9.0/lwjgl-2.9.0.jar")
        );

        let native = lib.native_artifact(&linux()).unwrap();
        assert!(native.sha1.is_none());
        assert_eq!(
            native.url,
            "https://libraries.minecraft.net/org/lwjgl/lwjgl/lwjgl/2.9.0/lwjgl-2.9.0-natives-linux-64.jar"
        );
    }

    #[test]
    fn legacy_library_honors_custom_repository() {
        let lib: Library = serde_json::from_value(serde_json::json!({
            "name": "com.example:thing:1.0",
            "url": "https://maven.example.com/releases/"
        }))
        .unwrap();

        let LibrarySource::Legacy { repository, .. } = &lib.source else {
            panic!("expected legacy source");
        };
        assert_eq!(repository, "https://maven.example.com/releases/");
    }

    #[test]
    fn natives_only_modern_entry_has_no_artifact_path() {
        let lib: Library = serde_json::from_value(serde_json::json!({
            "name": "org.lwjgl:lwjgl-platform:2.9.4",
            "downloads": {
                "classifiers": {
                    "natives-linux": {
                        "path": "p/lwjgl-platform-2.9.4-natives-linux.jar",
                        "sha1": "cccc",
                        "url": "https://libraries.minecraft.net/p/lwjgl-platform-2.9.4-natives-linux.jar"
                    }
                }
            },
            "natives": {"linux": "natives-linux"}
        }))
        .unwrap();

        assert!(lib.artifact_relative_path().is_none());
        assert!(lib.native_artifact(&linux()).is_some());
    }

    #[test]
    fn conditional_game_arguments_follow_rules() {
        let descriptor: VersionDescriptor = serde_json::from_value(serde_json::json!({
            "id": "test",
            "mainClass": "net.minecraft.client.main.Main",
            "arguments": {
                "game": [
                    "--username",
                    "${auth_player_name}",
                    {
                        "rules": [{"action": "allow", "os": {"name": "linux"}}],
                        "value": ["--linux-only", "yes"]
                    },
                    {
                        "rules": [{"action": "allow", "os": {"name": "windows"}}],
                        "value": "--windows-only"
                    },
                    {
                        "rules": [{"action": "allow", "features": {"is_demo_user": true}}],
                        "value": "--demo"
                    }
                ]
            }
        }))
        .unwrap();

        let tokens = descriptor.game_argument_tokens(&linux());
        assert_eq!(
            tokens,
            vec![
                "--username",
                "${auth_player_name}",
                "--linux-only",
                "yes",
                "--demo"
            ]
        );
    }

    #[test]
    fn legacy_argument_string_splits_on_whitespace() {
        let descriptor: VersionDescriptor = serde_json::from_value(serde_json::json!({
            "id": "1.7.10",
            "mainClass": "net.minecraft.client.main.Main",
            "minecraftArguments": "--username ${auth_player_name} --version ${version_name}"
        }))
        .unwrap();

        let tokens = descriptor.game_argument_tokens(&linux());
        assert_eq!(
            tokens,
            vec![
                "--username",
                "${auth_player_name}",
                "--version",
                "${version_name}"
            ]
        );
    }

    #[test]
    fn asset_index_name_fallback_chain() {
        let with_assets: VersionDescriptor =
            serde_json::from_value(serde_json::json!({"assets": "17"})).unwrap();
        assert_eq!(with_assets.asset_index_name("1.20.4"), "17");

        let with_index: VersionDescriptor = serde_json::from_value(serde_json::json!({
            "assetIndex": {"id": "12", "url": "https://example.com/12.json"}
        }))
        .unwrap();
        assert_eq!(with_index.asset_index_name("1.19"), "12");

        let bare: VersionDescriptor = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(bare.asset_index_name("1.8.9"), "1.8.9");
    }
}
