//! Startup configuration, read from the environment (a `.env` file is
//! honored by `main`). The token, admin identity, and gating channel have no
//! defaults: refusing to start beats guessing.

use std::env;

use thiserror::Error;

use crate::event::UserIdentity;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("{0} must be a numeric user id")]
    InvalidAdminId(&'static str),
    #[error("{0} must be `true` or `false`")]
    InvalidFlag(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Bot API credential. Absence is a fatal startup error.
    pub bot_token: String,
    /// The administrator who receives completed registrations and may not
    /// register themselves.
    pub admin: UserIdentity,
    /// Username of the channel membership in which gates completion,
    /// e.g. `@ourchannel`.
    pub channel: String,
    /// Whether the flow opens with the language picker.
    pub ask_language: bool,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = required("BOT_TOKEN")?;
        let admin = required("ADMIN_ID")?
            .parse::<u64>()
            .map(UserIdentity)
            .map_err(|_| ConfigError::InvalidAdminId("ADMIN_ID"))?;
        let channel = required("CHANNEL_USERNAME")?;
        let ask_language = match env::var("ASK_LANGUAGE") {
            Ok(v) => v
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidFlag("ASK_LANGUAGE"))?,
            Err(_) => true,
        };
        Ok(Self {
            bot_token,
            admin,
            channel,
            ask_language,
        })
    }
}
