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

use crate::{ChallengeNonce, EvmWalletAddress, WalletAuthChallenge};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Storage of outstanding challenges, keyed by wallet.
///
/// Every backend must make [`consume_challenge`] an indivisible
/// check-and-delete: of any number of concurrent callers presenting the same
/// nonce, exactly one succeeds.
///
/// [`consume_challenge`]: WalletAuthChallengeRepository::consume_challenge
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait WalletAuthChallengeRepository: Send + Sync {
    /// Upsert: replaces any pending challenge of the same wallet
    async fn set_challenge(&self, challenge: &WalletAuthChallenge) -> Result<(), SetChallengeError>;

    async fn get_challenge(
        &self,
        wallet: &EvmWalletAddress,
    ) -> Result<WalletAuthChallenge, GetChallengeError>;

    /// Removes the wallet's challenge only if it still carries `nonce`
    async fn consume_challenge(
        &self,
        wallet: &EvmWalletAddress,
        nonce: &ChallengeNonce,
    ) -> Result<(), ConsumeChallengeError>;

    /// Removes challenges with `expires_at < now`, returns how many
    async fn cleanup_expired_challenges(
        &self,
        now: DateTime<Utc>,
    ) -> Result<usize, CleanupExpiredChallengesError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum SetChallengeError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for SetChallengeError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum GetChallengeError {
    #[error(transparent)]
    NotFound(#[from] ChallengeNotFoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for GetChallengeError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum ConsumeChallengeError {
    #[error(transparent)]
    NotFound(#[from] ChallengeNotFoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for ConsumeChallengeError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum CleanupExpiredChallengesError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for CleanupExpiredChallengesError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Challenge not found for wallet: {wallet}")]
pub struct ChallengeNotFoundError {
    pub wallet: EvmWalletAddress,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
