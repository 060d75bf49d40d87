use chrono::Duration;
use log::{info, warn};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ConfigError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATABASE_URL: &str = "sqlite:article_voting.db";
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub database_url: String,
    pub token_secret: String,
    pub token_lifetime: Duration,
}

impl Config {
    // Read settings from the environment (call dotenvy first to pick up .env)
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_address = or_default(&lookup, "VOTING_BIND_ADDR", DEFAULT_BIND_ADDR);
        let database_url = or_default(&lookup, "DATABASE_URL", DEFAULT_DATABASE_URL);

        let token_secret = match lookup("VOTE_TOKEN_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None => {
                // Tokens issued before a restart stop verifying with a generated secret
                warn!("VOTE_TOKEN_SECRET not set, generating a per-process secret");
                Uuid::new_v4().to_string()
            }
        };

        let lifetime_secs: i64 = parse_or_default(&lookup, "VOTE_TOKEN_LIFETIME_SECS", DEFAULT_TOKEN_LIFETIME_SECS)?;
        if lifetime_secs < 2 {
            return Err(ConfigError::Invalid {
                key: "VOTE_TOKEN_LIFETIME_SECS",
                reason: format!("must be at least 2 seconds, got {}", lifetime_secs),
            });
        }

        Ok(Self {
            bind_address,
            database_url,
            token_secret,
            token_lifetime: Duration::seconds(lifetime_secs),
        })
    }
}

fn or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    })
}

fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}
