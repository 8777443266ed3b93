// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Duration, Utc};

use crate::{ChallengeNonce, EvmWalletAddress};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_CHALLENGE_TTL_SECONDS: i64 = 5 * 60;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Outstanding challenge awaiting a signed proof. At most one per wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAuthChallenge {
    pub wallet_address: EvmWalletAddress,
    pub nonce: ChallengeNonce,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl WalletAuthChallenge {
    pub fn new(wallet_address: EvmWalletAddress, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            wallet_address,
            nonce: ChallengeNonce::new(),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    /// A challenge is still acceptable at exactly `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
