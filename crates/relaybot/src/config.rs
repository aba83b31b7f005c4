//! Environment-provided configuration.

use std::env;
use std::error::Error;
use std::fmt::{self, Display};

use crate::messages;

const DEFAULT_MODEL: &str = "gpt-4o";

/// Everything the bot reads from the environment.
///
/// Only the transport and the model credentials are mandatory. A missing
/// weather credential degrades the weather tool to an explanatory reply
/// and affects nothing else.
#[derive(Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub model: String,
    pub preamble: String,
    pub openweather_api_key: Option<String>,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, MissingVarError> {
        Ok(Config {
            telegram_bot_token: require("TELEGRAM_BOT_TOKEN")?,
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_base_url: env::var("OPENAI_BASE_URL").ok(),
            model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_owned()),
            preamble: env::var("BOT_PREAMBLE")
                .unwrap_or_else(|_| messages::DEFAULT_PREAMBLE.to_owned()),
            openweather_api_key: env::var("OPENWEATHER_API_KEY").ok(),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("telegram_bot_token", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field(
                "openweather_api_key",
                &self.openweather_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish_non_exhaustive()
    }
}

fn require(name: &'static str) -> Result<String, MissingVarError> {
    env::var(name).map_err(|_| MissingVarError { name })
}

/// A mandatory environment variable is not set.
#[derive(Debug)]
pub struct MissingVarError {
    name: &'static str,
}

impl Display for MissingVarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} environment variable is not set", self.name)
    }
}

impl Error for MissingVarError {}
