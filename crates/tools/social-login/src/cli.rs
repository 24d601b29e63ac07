use crate::error::ToolError;
use crate::settings::{DEFAULT_CONFIG_FILE, Settings};
use clap::{Parser, Subcommand, ValueEnum};
use ras_identity_social::{AuthRequest, LinkedinClient, OidcClient, ProviderConfig, Token};
use std::path::PathBuf;

/// Drive social login flows from the command line
#[derive(Parser, Debug, Clone)]
#[command(name = "social-login")]
#[command(about = "Build authorization URLs, log in with a callback code, refresh tokens")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Provider to talk to
    #[arg(short, long, value_enum, default_value_t = ProviderKind::Linkedin)]
    pub provider: ProviderKind,

    /// Configuration file with provider credentials
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the authorization redirect URL
    Authorize,

    /// Exchange a callback code and print the normalized user
    Login {
        /// Authorization code from the provider callback
        #[arg(long)]
        code: String,
    },

    /// Exchange a refresh token for a new token
    Refresh {
        /// Access token currently held
        #[arg(long)]
        access_token: String,

        /// Refresh token; without it the provider reports an unsupported operation
        #[arg(long)]
        refresh_token: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Linkedin,
    Google,
}

impl ProviderKind {
    fn name(self) -> &'static str {
        match self {
            ProviderKind::Linkedin => "linkedin",
            ProviderKind::Google => "google",
        }
    }

    fn config<'a>(self, settings: &'a Settings) -> Result<&'a ProviderConfig, ToolError> {
        let config = match self {
            ProviderKind::Linkedin => settings.linkedin.as_ref(),
            ProviderKind::Google => settings.google.as_ref(),
        };
        config.ok_or_else(|| {
            ToolError::ProviderNotConfigured(
                self.name().to_string(),
                self.name().to_ascii_uppercase(),
            )
        })
    }

    pub fn client(self, settings: &Settings) -> Result<Box<dyn AuthRequest>, ToolError> {
        let config = self.config(settings)?.clone();
        let client: Box<dyn AuthRequest> = match self {
            ProviderKind::Linkedin => Box::new(LinkedinClient::linkedin_with_options(
                config,
                &settings.http,
            )?),
            ProviderKind::Google => {
                Box::new(OidcClient::google_with_options(config, &settings.http)?)
            }
        };
        Ok(client)
    }
}

impl Args {
    /// Runs the command and returns what should be printed on stdout.
    pub async fn run(&self) -> Result<String, ToolError> {
        let settings = Settings::load(&self.config)?;
        let client = self.provider.client(&settings)?;
        execute(client.as_ref(), &self.command).await
    }
}

pub async fn execute(client: &dyn AuthRequest, command: &Command) -> Result<String, ToolError> {
    let output = match command {
        Command::Authorize => client.authorize(),
        Command::Login { code } => serde_json::to_string_pretty(&client.login(code).await)?,
        Command::Refresh {
            access_token,
            refresh_token,
        } => {
            if access_token.trim().is_empty() {
                return Err(ToolError::InvalidArgument(
                    "--access-token must not be empty".to_string(),
                ));
            }
            let mut token = Token::new(access_token.as_str(), 0)?;
            if let Some(refresh_token) = refresh_token {
                token = token.with_refresh_token(refresh_token.as_str());
            }
            serde_json::to_string_pretty(&client.refresh(&token).await)?
        }
    };
    Ok(output)
}
