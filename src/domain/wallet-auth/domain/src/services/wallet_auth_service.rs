// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use internal_error::InternalError;
use thiserror::Error;

use crate::{
    ChallengeNonce,
    ChallengeNotFoundError,
    EvmWalletAddress,
    InvalidSignatureFormatError,
    InvalidWalletAddressError,
    SessionToken,
    SessionTokenError,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Two-phase wallet handshake (challenge, then signed proof) and validation
/// of the resulting sessions
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait WalletAuthService: Send + Sync {
    /// Issues a fresh challenge, replacing any pending one of the same wallet
    async fn request_challenge(
        &self,
        wallet_address: &str,
    ) -> Result<IssuedChallenge, RequestChallengeError>;

    /// Exchanges a signed challenge for a session token. A challenge is
    /// accepted at most once.
    async fn submit_proof(
        &self,
        wallet_address: &str,
        signature: &str,
        message: &str,
    ) -> Result<AuthenticatedSession, SubmitProofError>;

    async fn validate_session(&self, token: &str)
    -> Result<EvmWalletAddress, ValidateSessionError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    pub message: String,
    pub nonce: ChallengeNonce,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub token: SessionToken,
    pub wallet_address: EvmWalletAddress,
    /// TTL expression the token was issued with
    pub expires_in: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Coarse classification shared by all wallet auth errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletAuthErrorCategory {
    /// Malformed client input
    Validation,
    /// Challenge/proof rejected
    Protocol,
    /// Session token rejected
    Token,
    Internal,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum RequestChallengeError {
    #[error(transparent)]
    InvalidIdentity(#[from] InvalidWalletAddressError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl RequestChallengeError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidIdentity(_) => "InvalidIdentity",
            Self::Internal(_) => "Internal",
        }
    }

    pub fn category(&self) -> WalletAuthErrorCategory {
        match self {
            Self::InvalidIdentity(_) => WalletAuthErrorCategory::Validation,
            Self::Internal(_) => WalletAuthErrorCategory::Internal,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum SubmitProofError {
    #[error(transparent)]
    InvalidIdentity(#[from] InvalidWalletAddressError),

    #[error(transparent)]
    InvalidSignatureFormat(#[from] InvalidSignatureFormatError),

    #[error(transparent)]
    ChallengeNotFound(#[from] ChallengeNotFoundError),

    #[error("Challenge expired for wallet: {wallet}")]
    ChallengeExpired { wallet: EvmWalletAddress },

    #[error("Message does not contain the issued nonce")]
    NonceMismatch,

    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl SubmitProofError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidIdentity(_) => "InvalidIdentity",
            Self::InvalidSignatureFormat(_) => "InvalidSignatureFormat",
            Self::ChallengeNotFound(_) => "ChallengeNotFound",
            Self::ChallengeExpired { .. } => "ChallengeExpired",
            Self::NonceMismatch => "NonceMismatch",
            Self::SignatureInvalid => "SignatureInvalid",
            Self::Internal(_) => "Internal",
        }
    }

    pub fn category(&self) -> WalletAuthErrorCategory {
        match self {
            Self::InvalidIdentity(_) | Self::InvalidSignatureFormat(_) => {
                WalletAuthErrorCategory::Validation
            }
            Self::ChallengeNotFound(_)
            | Self::ChallengeExpired { .. }
            | Self::NonceMismatch
            | Self::SignatureInvalid => WalletAuthErrorCategory::Protocol,
            Self::Internal(_) => WalletAuthErrorCategory::Internal,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum ValidateSessionError {
    #[error(transparent)]
    Unauthorized(#[from] SessionTokenError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl ValidateSessionError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized(e) => e.kind(),
            Self::Internal(_) => "Internal",
        }
    }

    pub fn category(&self) -> WalletAuthErrorCategory {
        match self {
            Self::Unauthorized(_) => WalletAuthErrorCategory::Token,
            Self::Internal(_) => WalletAuthErrorCategory::Internal,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
