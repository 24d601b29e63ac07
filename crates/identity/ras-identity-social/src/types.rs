//! Token and normalized user types.

use crate::error::{SocialError, SocialResult};
use crate::json::{check_response, str_field, u64_field};
use crate::source::ProviderSource;
use serde::{Deserialize, Serialize};

/// Credentials issued by a token endpoint. A refresh yields a new `Token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TokenFields")]
pub struct Token {
    access_token: String,
    refresh_token: Option<String>,
    /// Provider-defined lifetime in seconds; 0 when not reported
    expires_in: u64,
    refresh_token_expires_in: Option<u64>,
    token_type: Option<String>,
    scope: Option<String>,
    id_token: Option<String>,
}

/// Serialized form of [`Token`], validated on the way in.
#[derive(Deserialize)]
struct TokenFields {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    refresh_token_expires_in: Option<u64>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

impl TryFrom<TokenFields> for Token {
    type Error = SocialError;

    fn try_from(fields: TokenFields) -> SocialResult<Self> {
        let mut token = Token::new(fields.access_token, fields.expires_in)?;
        if let Some(refresh_token) = fields.refresh_token {
            token = token.with_refresh_token(refresh_token);
        }
        token.refresh_token_expires_in = fields.refresh_token_expires_in;
        token.token_type = fields.token_type;
        token.scope = fields.scope;
        token.id_token = fields.id_token;
        Ok(token)
    }
}

impl Token {
    pub fn new(access_token: impl Into<String>, expires_in: u64) -> SocialResult<Self> {
        let access_token = access_token.into();
        if access_token.is_empty() {
            return Err(SocialError::MalformedResponse(
                "access_token must not be empty".to_string(),
            ));
        }

        Ok(Self {
            access_token,
            refresh_token: None,
            expires_in,
            refresh_token_expires_in: None,
            token_type: None,
            scope: None,
            id_token: None,
        })
    }

    /// Empty refresh tokens are stored as absent.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        let refresh_token = refresh_token.into();
        self.refresh_token = (!refresh_token.is_empty()).then_some(refresh_token);
        self
    }

    /// Parses a token endpoint body. Error-shaped bodies become provider errors.
    pub fn from_response(payload: &serde_json::Value) -> SocialResult<Self> {
        check_response(payload)?;

        let access_token = str_field(payload, "access_token").ok_or_else(|| {
            SocialError::MalformedResponse("token response has no access_token".to_string())
        })?;

        Ok(Self {
            access_token,
            refresh_token: str_field(payload, "refresh_token"),
            expires_in: u64_field(payload, "expires_in").unwrap_or_default(),
            refresh_token_expires_in: u64_field(payload, "refresh_token_expires_in"),
            token_type: str_field(payload, "token_type"),
            scope: str_field(payload, "scope"),
            id_token: str_field(payload, "id_token"),
        })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    pub fn refresh_token_expires_in(&self) -> Option<u64> {
        self.refresh_token_expires_in
    }

    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Maps common provider spellings; anything else is `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "m" | "male" | "1" => Gender::Male,
            "f" | "female" | "0" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

/// Provider-independent user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "UserRecordFields")]
pub struct UserRecord {
    uuid: String,
    display_name: String,
    nickname: String,
    avatar: Option<String>,
    email: Option<String>,
    gender: Gender,
    source: ProviderSource,
    token: Token,
    /// Profile payload as returned by the provider
    raw: serde_json::Value,
}

#[derive(Deserialize)]
struct UserRecordFields {
    uuid: String,
    display_name: String,
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    gender: Gender,
    source: ProviderSource,
    token: Token,
    #[serde(default)]
    raw: serde_json::Value,
}

impl TryFrom<UserRecordFields> for UserRecord {
    type Error = SocialError;

    fn try_from(fields: UserRecordFields) -> SocialResult<Self> {
        let user = UserRecord::new(fields.uuid, fields.display_name, fields.source, fields.token)?;
        let user = match fields.nickname.filter(|n| !n.is_empty()) {
            Some(nickname) => user.with_nickname(nickname),
            None => user,
        };
        Ok(user
            .with_avatar(fields.avatar)
            .with_email(fields.email)
            .with_gender(fields.gender)
            .with_raw(fields.raw))
    }
}

impl UserRecord {
    /// Both `uuid` and `display_name` must be non-empty. The nickname
    /// starts out equal to the display name.
    pub fn new(
        uuid: impl Into<String>,
        display_name: impl Into<String>,
        source: ProviderSource,
        token: Token,
    ) -> SocialResult<Self> {
        let uuid = uuid.into();
        let display_name = display_name.into();

        if uuid.trim().is_empty() {
            return Err(SocialError::MalformedResponse(
                "profile has no user id".to_string(),
            ));
        }
        if display_name.trim().is_empty() {
            return Err(SocialError::MalformedResponse(
                "profile has no usable name".to_string(),
            ));
        }

        Ok(Self {
            uuid,
            nickname: display_name.clone(),
            display_name,
            avatar: None,
            email: None,
            gender: Gender::Unknown,
            source,
            token,
            raw: serde_json::Value::Null,
        })
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    pub fn with_avatar(mut self, avatar: Option<String>) -> Self {
        self.avatar = avatar;
        self
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = raw;
        self
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn source(&self) -> &ProviderSource {
        &self.source
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    pub fn into_token(self) -> Token {
        self.token
    }
}
