// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
struct State {
    challenges_by_wallet: HashMap<EvmWalletAddress, WalletAuthChallenge>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Process-local store. Every mutation runs under the write lock, which makes
/// consumption a single check-and-delete step.
pub struct InMemoryWalletAuthChallengeRepository {
    state: Arc<RwLock<State>>,
}

#[dill::component(pub)]
#[dill::interface(dyn WalletAuthChallengeRepository)]
#[dill::scope(dill::Singleton)]
impl InMemoryWalletAuthChallengeRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl WalletAuthChallengeRepository for InMemoryWalletAuthChallengeRepository {
    async fn set_challenge(&self, challenge: &WalletAuthChallenge) -> Result<(), SetChallengeError> {
        let mut writable_state = self.state.write().await;

        writable_state
            .challenges_by_wallet
            .insert(challenge.wallet_address.clone(), challenge.clone());

        Ok(())
    }

    async fn get_challenge(
        &self,
        wallet: &EvmWalletAddress,
    ) -> Result<WalletAuthChallenge, GetChallengeError> {
        let readable_state = self.state.read().await;

        if let Some(challenge) = readable_state.challenges_by_wallet.get(wallet) {
            Ok(challenge.clone())
        } else {
            Err(ChallengeNotFoundError {
                wallet: wallet.clone(),
            }
            .into())
        }
    }

    async fn consume_challenge(
        &self,
        wallet: &EvmWalletAddress,
        nonce: &ChallengeNonce,
    ) -> Result<(), ConsumeChallengeError> {
        let mut writable_state = self.state.write().await;

        let is_current = writable_state
            .challenges_by_wallet
            .get(wallet)
            .is_some_and(|challenge| challenge.nonce == *nonce);

        if !is_current {
            return Err(ChallengeNotFoundError {
                wallet: wallet.clone(),
            }
            .into());
        }

        writable_state.challenges_by_wallet.remove(wallet);

        Ok(())
    }

    async fn cleanup_expired_challenges(
        &self,
        now: DateTime<Utc>,
    ) -> Result<usize, CleanupExpiredChallengesError> {
        let mut writable_state = self.state.write().await;

        let count_before = writable_state.challenges_by_wallet.len();
        writable_state
            .challenges_by_wallet
            .retain(|_, challenge| challenge.expires_at >= now);

        Ok(count_before - writable_state.challenges_by_wallet.len())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
