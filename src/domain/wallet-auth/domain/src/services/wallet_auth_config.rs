// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::Duration;
use secrecy::SecretString;

use crate::{DEFAULT_CHALLENGE_TTL_SECONDS, InvalidSessionTtlError, SessionTtl};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_DOMAIN: &str = "localhost:3000";
pub const DEFAULT_SESSION_TTL: &str = "7d";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct WalletAuthConfig {
    /// Embedded into challenge messages
    pub domain: String,
    pub challenge_ttl: Duration,
    pub session_ttl: SessionTtl,
    pub require_explicit_session_ttl: bool,
}

impl WalletAuthConfig {
    pub fn new(
        domain: impl Into<String>,
        session_ttl_expr: impl Into<String>,
        require_explicit_session_ttl: bool,
    ) -> Result<Self, InvalidSessionTtlError> {
        let session_ttl = if require_explicit_session_ttl {
            SessionTtl::parse_strict(session_ttl_expr)?
        } else {
            SessionTtl::parse(session_ttl_expr)
        };

        Ok(Self {
            domain: domain.into(),
            challenge_ttl: Duration::seconds(DEFAULT_CHALLENGE_TTL_SECONDS),
            session_ttl,
            require_explicit_session_ttl,
        })
    }

    pub fn with_challenge_ttl(mut self, challenge_ttl: Duration) -> Self {
        self.challenge_ttl = challenge_ttl;
        self
    }
}

impl Default for WalletAuthConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            challenge_ttl: Duration::seconds(DEFAULT_CHALLENGE_TTL_SECONDS),
            session_ttl: SessionTtl::parse(DEFAULT_SESSION_TTL),
            require_explicit_session_ttl: false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// HMAC key of session tokens
pub struct SessionTokenConfig {
    pub secret: SecretString,
}

impl SessionTokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
