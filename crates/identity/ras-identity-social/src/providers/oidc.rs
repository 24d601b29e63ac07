//! Flat OpenID-Connect style userinfo providers.

use crate::config::{ClientOptions, ProviderConfig};
use crate::error::SocialResult;
use crate::json::str_field;
use crate::request::{ProviderStrategy, SocialClient};
use crate::source::{ProviderDescriptor, ProviderSource};
use crate::types::{Gender, Token, UserRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field names to read from a flat userinfo payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfoMapping {
    pub subject_field: String,
    pub name_field: String,
    /// Consulted when the name field is missing
    pub nickname_field: Option<String>,
    pub email_field: Option<String>,
    pub picture_field: Option<String>,
    pub gender_field: Option<String>,
}

impl Default for UserInfoMapping {
    fn default() -> Self {
        Self {
            subject_field: "sub".to_string(),
            name_field: "name".to_string(),
            nickname_field: Some("preferred_username".to_string()),
            email_field: Some("email".to_string()),
            picture_field: Some("picture".to_string()),
            gender_field: Some("gender".to_string()),
        }
    }
}

/// Strategy for providers whose userinfo endpoint returns one flat object.
#[derive(Debug, Clone)]
pub struct FlatProfile {
    scopes: Vec<&'static str>,
    mapping: UserInfoMapping,
}

impl FlatProfile {
    pub fn new(scopes: Vec<&'static str>, mapping: UserInfoMapping) -> Self {
        Self { scopes, mapping }
    }

    pub fn openid() -> Self {
        Self::new(vec!["openid", "email", "profile"], UserInfoMapping::default())
    }

    fn optional(&self, profile: &Value, field: &Option<String>) -> Option<String> {
        field.as_deref().and_then(|f| str_field(profile, f))
    }
}

pub type OidcClient = SocialClient<FlatProfile>;

impl SocialClient<FlatProfile> {
    pub fn google(config: ProviderConfig) -> SocialResult<Self> {
        SocialClient::new(config, ProviderDescriptor::google(), FlatProfile::openid())
    }

    pub fn google_with_options(
        config: ProviderConfig,
        options: &ClientOptions,
    ) -> SocialResult<Self> {
        SocialClient::with_options(
            config,
            ProviderDescriptor::google(),
            FlatProfile::openid(),
            options,
        )
    }
}

#[async_trait]
impl ProviderStrategy for FlatProfile {
    fn default_scopes(&self) -> &[&'static str] {
        &self.scopes
    }

    fn normalize(
        &self,
        profile: &Value,
        source: &ProviderSource,
        token: Token,
    ) -> SocialResult<UserRecord> {
        let nickname = self.optional(profile, &self.mapping.nickname_field);
        let display_name = str_field(profile, &self.mapping.name_field)
            .or_else(|| nickname.clone())
            .unwrap_or_default();
        let gender = self
            .optional(profile, &self.mapping.gender_field)
            .map(|g| Gender::parse(&g))
            .unwrap_or_default();

        let user = UserRecord::new(
            str_field(profile, &self.mapping.subject_field).unwrap_or_default(),
            display_name,
            source.clone(),
            token,
        )?;

        let user = match nickname {
            Some(nickname) => user.with_nickname(nickname),
            None => user,
        };

        Ok(user
            .with_email(self.optional(profile, &self.mapping.email_field))
            .with_avatar(self.optional(profile, &self.mapping.picture_field))
            .with_gender(gender)
            .with_raw(profile.clone()))
    }
}
