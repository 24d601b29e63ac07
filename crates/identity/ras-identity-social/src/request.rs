//! Provider request contract and the orchestration shared by every provider.

use crate::config::{ClientOptions, ProviderConfig};
use crate::error::{SocialError, SocialResult};
use crate::exchange::HttpExchange;
use crate::json::check_response;
use crate::response::AuthResponse;
use crate::source::{ProviderDescriptor, ProviderSource};
use crate::types::{Token, UserRecord};
use crate::url_builder::UrlBuilder;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Operations every social login provider supports.
///
/// Expected failures are reported through the [`AuthResponse`] status rather
/// than as errors, so callers can branch on `status` uniformly.
#[async_trait]
pub trait AuthRequest: Send + Sync {
    fn source(&self) -> &ProviderSource;

    /// Authorization redirect URL. No network access.
    ///
    /// Identical across calls when the config carries a `state`; otherwise
    /// every call embeds a fresh UUID. Use
    /// [`SocialClient::authorize_url_with_state`] to get that state back for
    /// callback verification.
    fn authorize(&self) -> String;

    /// Exchanges the callback code and fetches the normalized profile.
    async fn login(&self, code: &str) -> AuthResponse<UserRecord>;

    /// Issues a new token from `token`'s refresh token.
    async fn refresh(&self, token: &Token) -> AuthResponse<Token>;

    /// Revokes the access token at the provider.
    async fn revoke(&self, token: &Token) -> AuthResponse<()>;
}

/// Endpoint access handed to provider hooks.
pub struct UserInfoContext<'a> {
    pub http: &'a HttpExchange,
    pub descriptor: &'a ProviderDescriptor,
}

/// Hooks that vary per provider.
#[async_trait]
pub trait ProviderStrategy: Send + Sync {
    fn default_scopes(&self) -> &[&'static str];

    fn user_info_url(&self, descriptor: &ProviderDescriptor) -> String {
        descriptor.user_info.clone()
    }

    /// Maps an already error-checked profile payload onto a [`UserRecord`].
    fn normalize(
        &self,
        profile: &Value,
        source: &ProviderSource,
        token: Token,
    ) -> SocialResult<UserRecord>;

    /// Fetches and normalizes the profile. Providers needing more than one
    /// request override this.
    async fn fetch_user(&self, ctx: UserInfoContext<'_>, token: Token) -> SocialResult<UserRecord> {
        let url = self.user_info_url(ctx.descriptor);
        let profile = ctx.http.get_json(&url, token.access_token()).await?;
        check_response(&profile)?;
        self.normalize(&profile, &ctx.descriptor.source, token)
    }
}

/// Provider client: immutable configuration plus one strategy.
#[derive(Clone)]
pub struct SocialClient<S> {
    config: ProviderConfig,
    descriptor: ProviderDescriptor,
    http: HttpExchange,
    strategy: S,
}

impl<S: ProviderStrategy> SocialClient<S> {
    pub fn new(
        config: ProviderConfig,
        descriptor: ProviderDescriptor,
        strategy: S,
    ) -> SocialResult<Self> {
        Self::with_options(config, descriptor, strategy, &ClientOptions::default())
    }

    pub fn with_options(
        config: ProviderConfig,
        descriptor: ProviderDescriptor,
        strategy: S,
        options: &ClientOptions,
    ) -> SocialResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            descriptor,
            http: HttpExchange::new(options)?,
            strategy,
        })
    }

    /// Replaces the endpoint set, e.g. to target a sandbox or proxy.
    pub fn with_descriptor(mut self, descriptor: ProviderDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn with_http(mut self, http: HttpExchange) -> Self {
        self.http = http;
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    fn state(&self) -> String {
        match self.config.state.as_deref() {
            Some(state) if !state.is_empty() => state.to_string(),
            _ => Uuid::new_v4().to_string(),
        }
    }

    pub fn authorize_url(&self) -> String {
        self.authorize_url_with_state().0
    }

    /// Authorization URL together with the `state` embedded in it.
    pub fn authorize_url_with_state(&self) -> (String, String) {
        let state = self.state();
        let mut builder = UrlBuilder::from_base_url(&self.descriptor.authorize)
            .query_param("response_type", "code")
            .query_param("client_id", &self.config.client_id)
            .query_param("redirect_uri", &self.config.redirect_uri)
            .query_param("state", &state)
            .query_param(
                "scope",
                self.config.scope_string(self.strategy.default_scopes()),
            );

        for (key, value) in &self.config.auth_params {
            builder = builder.query_param(key, value);
        }

        (builder.build(), state)
    }

    pub fn access_token_url(&self, code: &str) -> String {
        UrlBuilder::from_base_url(&self.descriptor.access_token)
            .query_param("code", code)
            .query_param("client_id", &self.config.client_id)
            .query_param("client_secret", &self.config.client_secret)
            .query_param("grant_type", "authorization_code")
            .query_param("redirect_uri", &self.config.redirect_uri)
            .build()
    }

    pub fn refresh_token_url(&self, refresh_token: &str) -> SocialResult<String> {
        let endpoint = self.descriptor.refresh.as_ref().ok_or_else(|| {
            SocialError::NotImplemented(format!(
                "{} does not support refresh",
                self.descriptor.source
            ))
        })?;

        Ok(UrlBuilder::from_base_url(endpoint)
            .query_param("client_id", &self.config.client_id)
            .query_param("client_secret", &self.config.client_secret)
            .query_param("refresh_token", refresh_token)
            .query_param("grant_type", "refresh_token")
            .query_param("redirect_uri", &self.config.redirect_uri)
            .build())
    }

    pub fn revoke_url(&self, token: &Token) -> SocialResult<String> {
        let endpoint = self.descriptor.revoke.as_ref().ok_or_else(|| {
            SocialError::NotImplemented(format!(
                "{} does not support revoke",
                self.descriptor.source
            ))
        })?;

        Ok(UrlBuilder::from_base_url(endpoint)
            .query_param("token", token.access_token())
            .build())
    }

    pub async fn exchange_code(&self, code: &str) -> SocialResult<Token> {
        if code.trim().is_empty() {
            return Err(SocialError::IllegalCode);
        }
        self.http.exchange_token(&self.access_token_url(code)).await
    }

    pub async fn fetch_user(&self, token: Token) -> SocialResult<UserRecord> {
        let ctx = UserInfoContext {
            http: &self.http,
            descriptor: &self.descriptor,
        };
        self.strategy.fetch_user(ctx, token).await
    }

    /// Code exchange followed by profile fetch; the first error aborts.
    pub async fn try_login(&self, code: &str) -> SocialResult<UserRecord> {
        let token = self.exchange_code(code).await?;
        self.fetch_user(token).await
    }

    /// Checks for a refresh token before touching the network.
    pub async fn try_refresh(&self, token: &Token) -> SocialResult<Token> {
        let refresh_token = token.refresh_token().ok_or_else(|| {
            SocialError::Unsupported("token has no refresh token".to_string())
        })?;
        let url = self.refresh_token_url(refresh_token)?;
        self.http.exchange_token(&url).await
    }

    pub async fn try_revoke(&self, token: &Token) -> SocialResult<()> {
        let url = self.revoke_url(token)?;
        let payload = self.http.post_form(&url).await?;
        check_response(&payload)
    }
}

fn log_failure(source: &ProviderSource, operation: &str, err: &SocialError) {
    if err.is_local() {
        warn!("{} {} rejected: {}", source, operation, err);
    } else {
        error!("{} {} failed: {}", source, operation, err);
    }
}

#[async_trait]
impl<S: ProviderStrategy> AuthRequest for SocialClient<S> {
    fn source(&self) -> &ProviderSource {
        &self.descriptor.source
    }

    fn authorize(&self) -> String {
        let url = self.authorize_url();
        debug!("Generated authorization URL for provider {}", self.descriptor.source);
        url
    }

    async fn login(&self, code: &str) -> AuthResponse<UserRecord> {
        let result = self.try_login(code).await;
        match &result {
            Ok(user) => info!(
                "Successfully logged in {} user {}",
                self.descriptor.source,
                user.uuid()
            ),
            Err(e) => log_failure(&self.descriptor.source, "login", e),
        }
        AuthResponse::from_result(result)
    }

    async fn refresh(&self, token: &Token) -> AuthResponse<Token> {
        let result = self.try_refresh(token).await;
        match &result {
            Ok(_) => info!("Refreshed {} access token", self.descriptor.source),
            Err(e) => log_failure(&self.descriptor.source, "refresh", e),
        }
        AuthResponse::from_result(result)
    }

    async fn revoke(&self, token: &Token) -> AuthResponse<()> {
        let result = self.try_revoke(token).await;
        if let Err(e) = &result {
            log_failure(&self.descriptor.source, "revoke", e);
        }
        AuthResponse::from_result(result)
    }
}
