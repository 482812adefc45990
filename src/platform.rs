// ─── Platform ───
// Host OS/architecture resolved once and injected into rule evaluation,
// native extraction and classpath building.

use std::fmt;

/// Operating system names as Mojang manifests spell them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsName {
    Windows,
    Osx,
    Linux,
}

impl OsName {
    /// The name used in `rules[].os.name` and legacy `natives` keys.
    pub fn manifest_name(&self) -> &'static str {
        match self {
            OsName::Windows => "windows",
            OsName::Osx => "osx",
            OsName::Linux => "linux",
        }
    }
}

impl fmt::Display for OsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.manifest_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86,
    X86_64,
    Aarch64,
    Other,
}

/// Host platform value. Resolved once at startup via `Platform::current()`;
/// tests construct fixed values instead of depending on the build host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: OsName,
    pub arch: Arch,
}

impl Platform {
    pub fn current() -> Self {
        let os = if cfg!(target_os = "windows") {
            OsName::Windows
        } else if cfg!(target_os = "macos") {
            OsName::Osx
        } else {
            OsName::Linux
        };

        let arch = match std::env::consts::ARCH {
            "x86" => Arch::X86,
            "x86_64" => Arch::X86_64,
            "aarch64" => Arch::Aarch64,
            _ => Arch::Other,
        };

        Self { os, arch }
    }

    /// Bitness string substituted into legacy `${arch}` natives keys.
    pub fn bits(&self) -> &'static str {
        match self.arch {
            Arch::X86 => "32",
            _ => "64",
        }
    }

    /// Match an `os.name` constraint from a rule.
    pub fn matches_os_name(&self, name: &str) -> bool {
        name == self.os.manifest_name()
    }

    /// Match an `os.arch` constraint. Advisory only: unrecognized values
    /// never match, which skips the rule rather than failing the install.
    pub fn matches_arch(&self, arch: &str) -> bool {
        match arch {
            "x86" => self.arch == Arch::X86,
            "x86_64" | "x64" | "amd64" => self.arch == Arch::X86_64,
            "arm64" | "aarch64" => self.arch == Arch::Aarch64,
            _ => false,
        }
    }

    fn arch_classifier_suffix(&self) -> Option<&'static str> {
        match self.arch {
            Arch::Aarch64 => Some("arm64"),
            Arch::X86 => Some("x86"),
            _ => None,
        }
    }

    /// Arch-qualified native-classifier keys (e.g. `natives-macos-arm64`).
    /// Empty when the arch has no qualified spelling (x86_64 is the
    /// unqualified default in Mojang manifests).
    pub fn arch_native_classifier_candidates(&self) -> Vec<String> {
        let Some(suffix) = self.arch_classifier_suffix() else {
            return Vec::new();
        };
        match self.os {
            OsName::Windows => vec![format!("natives-windows-{suffix}")],
            OsName::Osx => vec![
                format!("natives-macos-{suffix}"),
                format!("natives-osx-{suffix}"),
            ],
            OsName::Linux => vec![format!("natives-linux-{suffix}")],
        }
    }

    /// Candidate native-classifier keys, most specific first. Manifests use
    /// both `natives-macos` and `natives-osx` spellings for macOS, and
    /// arch-qualified keys (e.g. `natives-macos-arm64`) on newer versions.
    pub fn native_classifier_candidates(&self) -> Vec<String> {
        let mut candidates = self.arch_native_classifier_candidates();
        match self.os {
            OsName::Windows => candidates.push("natives-windows".into()),
            OsName::Osx => {
                candidates.push("natives-macos".into());
                candidates.push("natives-osx".into());
            }
            OsName::Linux => candidates.push("natives-linux".into()),
        }
        candidates
    }

    /// Java classpath separator for this platform.
    pub fn classpath_separator(&self) -> &'static str {
        match self.os {
            OsName::Windows => ";",
            _ => ":",
        }
    }
}
