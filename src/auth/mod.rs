// ─── Authentication ───
// The launcher only needs a name, a uuid and a token to template the game's
// arguments. Online flows implement `Authenticator`; offline play fabricates
// an identity locally.

use async_trait::async_trait;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::LauncherResult;

/// The credential triple substituted into launch arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchIdentity {
    pub username: String,
    pub uuid: String,
    pub access_token: String,
}

impl LaunchIdentity {
    /// Identity for offline play: a random uuid and a placeholder token.
    pub fn offline(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            uuid: Uuid::new_v4().to_string(),
            access_token: "offline_access_token".to_string(),
        }
    }
}

/// A java agent that redirects session endpoints to a third-party
/// authentication provider, attached with `-javaagent:<jar>=<host>`.
#[derive(Debug, Clone)]
pub struct AuthInjector {
    pub agent_jar: PathBuf,
    pub provider_host: String,
}

/// Produces a [`LaunchIdentity`], possibly via a network exchange.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self) -> LauncherResult<LaunchIdentity>;
}

/// No-network authenticator for offline play.
pub struct OfflineAuthenticator {
    username: String,
}

impl OfflineAuthenticator {
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into() }
    }
}

#[async_trait]
impl Authenticator for OfflineAuthenticator {
    async fn authenticate(&self) -> LauncherResult<LaunchIdentity> {
        Ok(LaunchIdentity::offline(&self.username))
    }
}
