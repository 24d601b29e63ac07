//! Command-line harness over `ras-identity-social`.

pub mod cli;
pub mod error;
pub mod settings;

pub use cli::{Args, Command, ProviderKind, execute};
pub use error::ToolError;
pub use settings::Settings;
