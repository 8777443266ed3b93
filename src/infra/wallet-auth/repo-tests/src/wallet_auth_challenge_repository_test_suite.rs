// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Duration, TimeZone, Utc};
use dill::Catalog;
use pretty_assertions::assert_eq;
use wallet_auth::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const WALLET_A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const WALLET_B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

const CONCURRENT_CONSUMERS: usize = 16;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_get_missing_challenge(catalog: &Catalog) {
    let challenge_repo = catalog
        .get_one::<dyn WalletAuthChallengeRepository>()
        .unwrap();

    let wallet = wallet(WALLET_A);

    assert_eq!(
        challenge_repo.get_challenge(&wallet).await,
        Err(GetChallengeError::NotFound(ChallengeNotFoundError {
            wallet
        }))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_set_and_get_challenge(catalog: &Catalog) {
    let challenge_repo = catalog
        .get_one::<dyn WalletAuthChallengeRepository>()
        .unwrap();

    let challenge = challenge(WALLET_A, t0());

    assert_eq!(challenge_repo.set_challenge(&challenge).await, Ok(()));
    assert_eq!(
        challenge_repo.get_challenge(&challenge.wallet_address).await,
        Ok(challenge)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_set_challenge_replaces_pending_one(catalog: &Catalog) {
    let challenge_repo = catalog
        .get_one::<dyn WalletAuthChallengeRepository>()
        .unwrap();

    let first = challenge(WALLET_A, t0());
    let second = challenge(WALLET_A, t0() + Duration::seconds(10));
    assert_ne!(first.nonce, second.nonce);

    challenge_repo.set_challenge(&first).await.unwrap();
    challenge_repo.set_challenge(&second).await.unwrap();

    assert_eq!(
        challenge_repo.get_challenge(&first.wallet_address).await,
        Ok(second.clone())
    );

    // The replaced nonce can no longer be consumed
    assert_eq!(
        challenge_repo
            .consume_challenge(&first.wallet_address, &first.nonce)
            .await,
        Err(ConsumeChallengeError::NotFound(ChallengeNotFoundError {
            wallet: first.wallet_address.clone()
        }))
    );
    assert_eq!(
        challenge_repo.get_challenge(&second.wallet_address).await,
        Ok(second)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_consume_challenge_once(catalog: &Catalog) {
    let challenge_repo = catalog
        .get_one::<dyn WalletAuthChallengeRepository>()
        .unwrap();

    let challenge = challenge(WALLET_A, t0());
    challenge_repo.set_challenge(&challenge).await.unwrap();

    assert_eq!(
        challenge_repo
            .consume_challenge(&challenge.wallet_address, &challenge.nonce)
            .await,
        Ok(())
    );

    let not_found = ChallengeNotFoundError {
        wallet: challenge.wallet_address.clone(),
    };
    assert_eq!(
        challenge_repo
            .consume_challenge(&challenge.wallet_address, &challenge.nonce)
            .await,
        Err(ConsumeChallengeError::NotFound(ChallengeNotFoundError {
            wallet: challenge.wallet_address.clone()
        }))
    );
    assert_eq!(
        challenge_repo.get_challenge(&challenge.wallet_address).await,
        Err(GetChallengeError::NotFound(not_found))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_concurrent_consume_has_single_winner(catalog: &Catalog) {
    let challenge_repo = catalog
        .get_one::<dyn WalletAuthChallengeRepository>()
        .unwrap();

    let challenge = challenge(WALLET_A, t0());
    challenge_repo.set_challenge(&challenge).await.unwrap();

    let handles = (0..CONCURRENT_CONSUMERS).map(|_| {
        let challenge_repo = challenge_repo.clone();
        let challenge = challenge.clone();

        tokio::spawn(async move {
            challenge_repo
                .consume_challenge(&challenge.wallet_address, &challenge.nonce)
                .await
        })
    });

    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    let winners = results.iter().filter(|res| res.is_ok()).count();
    let losers = results
        .iter()
        .filter(|res| matches!(res, Err(ConsumeChallengeError::NotFound(_))))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(losers, CONCURRENT_CONSUMERS - 1);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_wallets_are_independent(catalog: &Catalog) {
    let challenge_repo = catalog
        .get_one::<dyn WalletAuthChallengeRepository>()
        .unwrap();

    let challenge_a = challenge(WALLET_A, t0());
    let challenge_b = challenge(WALLET_B, t0());
    challenge_repo.set_challenge(&challenge_a).await.unwrap();
    challenge_repo.set_challenge(&challenge_b).await.unwrap();

    // A foreign nonce does not consume anything
    assert!(matches!(
        challenge_repo
            .consume_challenge(&challenge_a.wallet_address, &challenge_b.nonce)
            .await,
        Err(ConsumeChallengeError::NotFound(_))
    ));

    challenge_repo
        .consume_challenge(&challenge_a.wallet_address, &challenge_a.nonce)
        .await
        .unwrap();

    assert_eq!(
        challenge_repo.get_challenge(&challenge_b.wallet_address).await,
        Ok(challenge_b)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_cleanup_expired_challenges(catalog: &Catalog) {
    let challenge_repo = catalog
        .get_one::<dyn WalletAuthChallengeRepository>()
        .unwrap();

    let old = challenge(WALLET_A, t0());
    let fresh = challenge(WALLET_B, t0() + Duration::minutes(4));
    challenge_repo.set_challenge(&old).await.unwrap();
    challenge_repo.set_challenge(&fresh).await.unwrap();

    // Nothing is past its expiry yet, including an entry expiring right now
    assert_eq!(
        challenge_repo
            .cleanup_expired_challenges(old.expires_at)
            .await,
        Ok(0)
    );
    assert_eq!(
        challenge_repo
            .cleanup_expired_challenges(old.expires_at + Duration::seconds(1))
            .await,
        Ok(1)
    );

    assert!(matches!(
        challenge_repo.get_challenge(&old.wallet_address).await,
        Err(GetChallengeError::NotFound(_))
    ));
    assert_eq!(
        challenge_repo.get_challenge(&fresh.wallet_address).await,
        Ok(fresh.clone())
    );

    assert_eq!(
        challenge_repo
            .cleanup_expired_challenges(fresh.expires_at + Duration::seconds(1))
            .await,
        Ok(1)
    );
    assert_eq!(
        challenge_repo
            .cleanup_expired_challenges(fresh.expires_at + Duration::days(1))
            .await,
        Ok(0)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Helpers
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2050, 1, 2, 12, 0, 0).unwrap()
}

fn wallet(address: &str) -> EvmWalletAddress {
    EvmWalletAddress::parse(address).unwrap()
}

fn challenge(address: &str, issued_at: DateTime<Utc>) -> WalletAuthChallenge {
    WalletAuthChallenge::new(
        wallet(address),
        issued_at,
        Duration::seconds(DEFAULT_CHALLENGE_TTL_SECONDS),
    )
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
