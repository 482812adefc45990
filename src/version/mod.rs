// ─── Version ───
// Mojang version manifest, per-version descriptors, rule evaluation and
// inheritance resolution.

pub mod descriptor;
pub mod manifest;
pub mod resolver;
pub mod rules;

pub use descriptor::{
    Arguments, AssetIndexRef, DownloadArtifact, ExtractRules, GameArgument, Library,
    LibraryArtifact, LibrarySource, VersionDescriptor,
};
pub use manifest::{VersionKind, VersionManifest, VersionSummary};
pub use rules::{OsConstraint, Rule, RuleAction};
