// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;

use crate::{EvmWalletAddress, SessionToken, SessionTokenClaims, SessionTtl};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg_attr(any(feature = "testing", test), mockall::automock)]
pub trait SessionTokenService: Send + Sync {
    /// Issues a token for `wallet` as of now; a TTL without duration produces
    /// a token that never expires
    fn issue_token(
        &self,
        wallet: &EvmWalletAddress,
        ttl: &SessionTtl,
    ) -> Result<SessionToken, InternalError>;

    fn verify_token(&self, token: &str) -> Result<SessionTokenClaims, SessionTokenError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTokenError {
    #[error("Malformed session token")]
    Malformed,

    #[error("Invalid session token signature")]
    InvalidSignature,

    #[error("Session token expired")]
    Expired,
}

impl SessionTokenError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Malformed => "TokenMalformed",
            Self::InvalidSignature => "TokenInvalidSignature",
            Self::Expired => "TokenExpired",
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
