//! Provider credentials loaded from `social.toml` and `SOCIAL__*` variables.
//!
//! Environment variables take precedence over the file, e.g.
//! `SOCIAL__LINKEDIN__CLIENT_ID` overrides `[linkedin] client_id`.

use crate::error::ToolError;
use config::{Config as ConfigBuilder, Environment, File};
use ras_identity_social::{ClientOptions, ProviderConfig};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_CONFIG_FILE: &str = "social.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub http: ClientOptions,
    pub linkedin: Option<ProviderConfig>,
    pub google: Option<ProviderConfig>,
}

impl Settings {
    pub fn load(config_path: &Path) -> Result<Self, ToolError> {
        let mut builder = ConfigBuilder::builder();

        if config_path.exists() {
            info!("Loading configuration from {}", config_path.display());
            builder = builder.add_source(File::from(config_path));
        } else {
            debug!(
                "No config file found at {}, using environment only",
                config_path.display()
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("SOCIAL")
                .separator("__")
                .try_parsing(false),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}
