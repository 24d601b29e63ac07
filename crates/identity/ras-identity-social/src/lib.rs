//! Social login client layer.
//!
//! Exchanges an authorization code for a token, fetches the user's profile from
//! the provider's REST API and normalizes it into a provider-independent
//! [`UserRecord`]. Every provider shares the orchestration in [`SocialClient`]
//! and differs only in its [`ProviderStrategy`]: scopes, profile request and
//! field mapping.
//!
//! The crate keeps no sessions and stores no tokens; state verification on the
//! callback is left to the caller.

mod config;
mod error;
mod exchange;
pub mod json;
pub mod providers;
mod request;
mod response;
mod source;
mod types;
mod url_builder;


pub use config::{ClientOptions, ProviderConfig};
pub use error::{SocialError, SocialResult};
pub use exchange::HttpExchange;
pub use providers::{FlatProfile, Linkedin, LinkedinClient, OidcClient, UserInfoMapping};
pub use request::{AuthRequest, ProviderStrategy, SocialClient, UserInfoContext};
pub use response::{AuthResponse, AuthStatus};
pub use source::{ProviderDescriptor, ProviderSource};
pub use types::{Gender, Token, UserRecord};
pub use url_builder::UrlBuilder;
