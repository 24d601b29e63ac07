//! Social login configuration types.

use crate::error::{SocialError, SocialResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Authorization URL parameters owned by the client; `auth_params` may not
/// override them.
const RESERVED_AUTH_PARAMS: &[&str] = &[
    "response_type",
    "client_id",
    "redirect_uri",
    "state",
    "scope",
];

/// Credentials and callback settings for one provider client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Anti-CSRF state echoed back on the callback. A fresh UUID is used when absent.
    #[serde(default)]
    pub state: Option<String>,
    /// Overrides the provider's default scopes
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
    /// Additional parameters appended to the authorization URL, in key order
    #[serde(default)]
    pub auth_params: BTreeMap<String, String>,
}

impl ProviderConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            state: None,
            scopes: None,
            auth_params: BTreeMap::new(),
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_auth_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth_params.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> SocialResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(SocialError::ConfigError("client_id is required".to_string()));
        }
        if self.client_secret.trim().is_empty() {
            return Err(SocialError::ConfigError(
                "client_secret is required".to_string(),
            ));
        }
        if self.redirect_uri.trim().is_empty() {
            return Err(SocialError::ConfigError(
                "redirect_uri is required".to_string(),
            ));
        }

        let redirect = Url::parse(&self.redirect_uri)
            .map_err(|_| SocialError::IllegalRedirectUri(self.redirect_uri.clone()))?;
        if !matches!(redirect.scheme(), "http" | "https") {
            return Err(SocialError::IllegalRedirectUri(self.redirect_uri.clone()));
        }

        if let Some(key) = self
            .auth_params
            .keys()
            .find(|key| RESERVED_AUTH_PARAMS.contains(&key.as_str()))
        {
            return Err(SocialError::ConfigError(format!(
                "auth_params must not set '{}'",
                key
            )));
        }

        Ok(())
    }

    /// Space-joined scope string, falling back to `defaults`.
    pub(crate) fn scope_string(&self, defaults: &[&str]) -> String {
        match &self.scopes {
            Some(scopes) => scopes.join(" "),
            None => defaults.join(" "),
        }
    }
}

/// Transport settings for the HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientOptions {
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_http_timeout() -> u64 {
    30
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            http_timeout_seconds: default_http_timeout(),
            user_agent: None,
        }
    }
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.http_timeout_seconds = seconds;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
