//! Provider identity tags and endpoint descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity provider a user record originates from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderSource {
    Linkedin,
    Google,
    Custom(String),
}

impl fmt::Display for ProviderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderSource::Linkedin => f.write_str("linkedin"),
            ProviderSource::Google => f.write_str("google"),
            ProviderSource::Custom(name) => write!(f, "custom:{}", name),
        }
    }
}

/// Endpoint set of a provider. Constant per provider type; tests and
/// proxies may substitute their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub source: ProviderSource,
    pub authorize: String,
    pub access_token: String,
    pub user_info: String,
    /// Separate email endpoint, for providers that do not return it with the profile
    pub email: Option<String>,
    pub refresh: Option<String>,
    pub revoke: Option<String>,
}

impl ProviderDescriptor {
    pub fn linkedin() -> Self {
        Self {
            source: ProviderSource::Linkedin,
            authorize: "https://www.linkedin.com/oauth/v2/authorization".to_string(),
            access_token: "https://www.linkedin.com/oauth/v2/accessToken".to_string(),
            user_info: "https://api.linkedin.com/v2/me".to_string(),
            email: Some("https://api.linkedin.com/v2/emailAddress".to_string()),
            refresh: Some("https://www.linkedin.com/oauth/v2/accessToken".to_string()),
            revoke: None,
        }
    }

    pub fn google() -> Self {
        Self {
            source: ProviderSource::Google,
            authorize: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            access_token: "https://oauth2.googleapis.com/token".to_string(),
            user_info: "https://openidconnect.googleapis.com/v1/userinfo".to_string(),
            email: None,
            refresh: Some("https://oauth2.googleapis.com/token".to_string()),
            revoke: Some("https://oauth2.googleapis.com/revoke".to_string()),
        }
    }

    /// Descriptor for a provider hosted under a single base URL using the
    /// conventional `/authorize`, `/token`, `/userinfo` and `/revoke` paths.
    pub fn custom(name: impl Into<String>, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            source: ProviderSource::Custom(name.into()),
            authorize: format!("{}/authorize", base),
            access_token: format!("{}/token", base),
            user_info: format!("{}/userinfo", base),
            email: None,
            refresh: Some(format!("{}/token", base)),
            revoke: Some(format!("{}/revoke", base)),
        }
    }

    /// Points every endpoint at `base_url`, keeping each endpoint's path
    /// and query.
    pub fn rebased(&self, base_url: &str) -> crate::SocialResult<Self> {
        let base = url::Url::parse(base_url)?;
        let rebase = |endpoint: &str| -> crate::SocialResult<String> {
            let endpoint_url = url::Url::parse(endpoint)?;
            let mut moved = base.join(endpoint_url.path())?;
            moved.set_query(endpoint_url.query());
            Ok(moved.to_string())
        };
        let rebase_opt = |endpoint: &Option<String>| -> crate::SocialResult<Option<String>> {
            endpoint.as_deref().map(rebase).transpose()
        };

        Ok(Self {
            source: self.source.clone(),
            authorize: rebase(&self.authorize)?,
            access_token: rebase(&self.access_token)?,
            user_info: rebase(&self.user_info)?,
            email: rebase_opt(&self.email)?,
            refresh: rebase_opt(&self.refresh)?,
            revoke: rebase_opt(&self.revoke)?,
        })
    }
}
