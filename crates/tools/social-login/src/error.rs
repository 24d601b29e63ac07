use ras_identity_social::SocialError;
use thiserror::Error;

/// Errors raised while preparing a provider client or its input
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Provider '{0}' is not configured (add a [{0}] table or SOCIAL__{1}__* variables)")]
    ProviderNotConfigured(String, String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Social(#[from] SocialError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}
