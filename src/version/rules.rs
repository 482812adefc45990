// ─── Rule Evaluation ───
// Decides whether a library or argument entry applies to a platform.

use std::collections::HashMap;

use serde::Deserialize;

use crate::platform::Platform;

#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsConstraint>,
    /// Feature flags on argument rules. This core treats every feature
    /// constraint as satisfied.
    #[serde(default)]
    pub features: Option<HashMap<String, bool>>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsConstraint {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl Rule {
    /// Whether this rule's constraints match the given platform.
    ///
    /// An absent `os` block is unconditional. The `os.version` constraint
    /// (an OS version regex in upstream manifests) is advisory and treated
    /// as matching, as is any `features` block.
    fn matches(&self, platform: &Platform) -> bool {
        let Some(os) = &self.os else {
            return true;
        };

        if let Some(name) = &os.name {
            if !platform.matches_os_name(name) {
                return false;
            }
        }
        if let Some(arch) = &os.arch {
            if !platform.matches_arch(arch) {
                return false;
            }
        }

        true
    }
}

/// Evaluate a rule list against a platform.
///
/// Mojang semantics: start disallowed, walk the rules in order, and let
/// every rule whose constraints match flip the state to its action. The
/// last matching rule wins. Callers must not invoke this for entries
/// without rules — those are included unconditionally.
pub fn rules_allow(rules: &[Rule], platform: &Platform) -> bool {
    let mut allowed = false;

    for rule in rules {
        if rule.matches(platform) {
            allowed = rule.action == RuleAction::Allow;
        }
    }

    allowed
}
