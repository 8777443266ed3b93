// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use rand::Rng;
use rand::distributions::Alphanumeric;
use thiserror::Error;
use wallet_auth::{
    DEFAULT_DOMAIN,
    DEFAULT_SESSION_TTL,
    InvalidSessionTtlError,
    SessionTokenConfig,
    WalletAuthConfig,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const ENV_VAR_JWT_SECRET: &str = "JWT_SECRET";
pub const ENV_VAR_JWT_EXPIRES_IN: &str = "JWT_EXPIRES_IN";
pub const ENV_VAR_DOMAIN: &str = "DOMAIN";
pub const ENV_VAR_PORT: &str = "PORT";
pub const ENV_VAR_REQUIRE_EXPLICIT_TTL: &str = "WALLET_AUTH_REQUIRE_EXPLICIT_TTL";

pub const DEFAULT_PORT: u16 = 3001;

const DEV_SECRET_LEN: usize = 64;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Everything the server reads from the environment at startup
pub struct ServerConfig {
    pub wallet_auth: WalletAuthConfig,
    pub session_token: SessionTokenConfig,
    pub port: u16,
    /// Set when no secret was configured and a throwaway one was generated
    pub uses_generated_secret: bool,
}

impl ServerConfig {
    pub fn load_from_env(dev_mode: bool) -> Result<Self, ConfigError> {
        Self::load(|name| std::env::var(name).ok(), dev_mode)
    }

    pub fn load(
        var: impl Fn(&str) -> Option<String>,
        dev_mode: bool,
    ) -> Result<Self, ConfigError> {
        let (secret, uses_generated_secret) = match var(ENV_VAR_JWT_SECRET) {
            Some(secret) if !secret.is_empty() => (secret, false),
            _ if dev_mode => (generate_dev_secret(), true),
            _ => return Err(ConfigError::MissingSecret),
        };

        let require_explicit_session_ttl = match var(ENV_VAR_REQUIRE_EXPLICIT_TTL) {
            Some(value) => parse_flag(ENV_VAR_REQUIRE_EXPLICIT_TTL, &value)?,
            None => false,
        };

        let wallet_auth = WalletAuthConfig::new(
            var(ENV_VAR_DOMAIN).unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            var(ENV_VAR_JWT_EXPIRES_IN).unwrap_or_else(|| DEFAULT_SESSION_TTL.to_string()),
            require_explicit_session_ttl,
        )?;

        let port = match var(ENV_VAR_PORT) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            wallet_auth,
            session_token: SessionTokenConfig::new(secret),
            port,
            uses_generated_secret,
        })
    }
}

fn generate_dev_secret() -> String {
    rand::rngs::OsRng
        .sample_iter(&Alphanumeric)
        .take(DEV_SECRET_LEN)
        .map(char::from)
        .collect()
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set. Provide a secret or run with --dev")]
    MissingSecret,

    #[error("Invalid PORT: '{value}'")]
    InvalidPort { value: String },

    #[error("Invalid value of {name}: '{value}'")]
    InvalidFlag { name: &'static str, value: String },

    #[error(transparent)]
    InvalidSessionTtl(#[from] InvalidSessionTtlError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
