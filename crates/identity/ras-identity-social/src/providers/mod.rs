//! Provider strategies.

pub mod linkedin;
pub mod oidc;

pub use linkedin::{Linkedin, LinkedinClient};
pub use oidc::{FlatProfile, OidcClient, UserInfoMapping};
