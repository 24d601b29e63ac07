//! LinkedIn sign-in.
//!
//! The profile comes from `/v2/me` with a Rest.li projection; the email
//! address needs a second request against `/v2/emailAddress`. Names arrive
//! either flattened (`localizedFirstName`) or as a locale map keyed by
//! `<language>_<country>` with a `preferredLocale` selector.

use crate::config::{ClientOptions, ProviderConfig};
use crate::error::SocialResult;
use crate::json::{check_response, first_element, last_element, lookup, str_field};
use crate::request::{ProviderStrategy, SocialClient, UserInfoContext};
use crate::source::{ProviderDescriptor, ProviderSource};
use crate::types::{Gender, Token, UserRecord};
use crate::url_builder::UrlBuilder;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

const PROFILE_PROJECTION: &str =
    "(id,firstName,lastName,profilePicture(displayImage~:playableStreams))";
const EMAIL_PROJECTION: &str = "(elements*(handle~))";

pub type LinkedinClient = SocialClient<Linkedin>;

#[derive(Debug, Clone, Copy, Default)]
pub struct Linkedin;

impl SocialClient<Linkedin> {
    pub fn linkedin(config: ProviderConfig) -> SocialResult<Self> {
        SocialClient::new(config, ProviderDescriptor::linkedin(), Linkedin)
    }

    pub fn linkedin_with_options(
        config: ProviderConfig,
        options: &ClientOptions,
    ) -> SocialResult<Self> {
        SocialClient::with_options(config, ProviderDescriptor::linkedin(), Linkedin, options)
    }
}

impl Linkedin {
    fn email_url(descriptor: &ProviderDescriptor) -> Option<String> {
        descriptor.email.as_ref().map(|endpoint| {
            UrlBuilder::from_base_url(endpoint)
                .query_param("q", "members")
                .query_param("projection", EMAIL_PROJECTION)
                .build()
        })
    }

    async fn fetch_email(
        ctx: &UserInfoContext<'_>,
        access_token: &str,
    ) -> SocialResult<Option<String>> {
        let Some(url) = Self::email_url(ctx.descriptor) else {
            return Ok(None);
        };

        let payload = ctx.http.get_json(&url, access_token).await?;
        check_response(&payload)?;
        Ok(resolve_email(&payload))
    }
}

#[async_trait]
impl ProviderStrategy for Linkedin {
    fn default_scopes(&self) -> &[&'static str] {
        &["r_liteprofile", "r_emailaddress", "w_member_social"]
    }

    fn user_info_url(&self, descriptor: &ProviderDescriptor) -> String {
        UrlBuilder::from_base_url(&descriptor.user_info)
            .query_param("projection", PROFILE_PROJECTION)
            .build()
    }

    fn normalize(
        &self,
        profile: &Value,
        source: &ProviderSource,
        token: Token,
    ) -> SocialResult<UserRecord> {
        let name = display_name(profile);

        Ok(UserRecord::new(
            str_field(profile, "id").unwrap_or_default(),
            name,
            source.clone(),
            token,
        )?
        .with_avatar(resolve_avatar(profile))
        .with_gender(Gender::Unknown)
        .with_raw(profile.clone()))
    }

    async fn fetch_user(&self, ctx: UserInfoContext<'_>, token: Token) -> SocialResult<UserRecord> {
        let profile = ctx
            .http
            .get_json(&self.user_info_url(ctx.descriptor), token.access_token())
            .await?;
        check_response(&profile)?;

        let email = Self::fetch_email(&ctx, token.access_token()).await?;
        debug!("LinkedIn email resolved: {}", email.is_some());

        Ok(self
            .normalize(&profile, &ctx.descriptor.source, token)?
            .with_email(email))
    }
}

/// First and last name joined by a single space; a missing half is skipped.
pub fn display_name(profile: &Value) -> String {
    [
        resolve_name(profile, "localizedFirstName", "firstName"),
        resolve_name(profile, "localizedLastName", "lastName"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}

/// Flattened field first, then the locale map selected by `preferredLocale`.
pub fn resolve_name(profile: &Value, flat_key: &str, nested_key: &str) -> Option<String> {
    str_field(profile, flat_key).or_else(|| localized(profile.get(nested_key)?))
}

fn localized(field: &Value) -> Option<String> {
    let locale = field.get("preferredLocale")?;
    let key = format!(
        "{}_{}",
        str_field(locale, "language")?,
        str_field(locale, "country")?
    );
    str_field(field.get("localized")?, &key)
}

/// Variants are ordered smallest to largest; the last one wins.
pub fn resolve_avatar(profile: &Value) -> Option<String> {
    let elements = lookup(profile, &["profilePicture", "displayImage~", "elements"])?;
    let largest = last_element(elements)?;
    str_field(first_element(largest.get("identifiers")?)?, "identifier")
}

pub fn resolve_email(payload: &Value) -> Option<String> {
    let first = first_element(payload.get("elements")?)?;
    str_field(first.get("handle~")?, "emailAddress")
}
