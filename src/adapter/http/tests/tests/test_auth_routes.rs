// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::Duration;
use internal_error::InternalError;
use pretty_assertions::assert_eq;
use serde_json::json;
use wallet_auth::MockWalletSignatureVerifier;
use wallet_auth::testing::EvmTestWallet;

use crate::harness::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_sign_in_flow() {
    let harness = ServerSideHarness::new(ServerSideHarnessOptions::default()).await;
    let root_url = harness.root_url();
    let wallet = EvmTestWallet::from_seed(1);

    let client = async move {
        let cl = reqwest::Client::new();

        let res = cl
            .post(format!("{root_url}/api/auth/nonce"))
            .json(&json!({ "address": wallet.checksummed_address() }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::OK);

        let challenge = res.json::<serde_json::Value>().await.unwrap();
        let message = challenge["message"].as_str().unwrap().to_string();
        let nonce = challenge["nonce"].as_str().unwrap();

        assert!(message.contains(&format!("Nonce: {nonce}")));
        assert!(message.contains(&wallet.checksummed_address()));
        assert_eq!(
            challenge["timestamp"],
            json!(ServerSideHarness::t0().timestamp_millis())
        );
        assert_eq!(
            challenge["expiresAt"],
            json!((ServerSideHarness::t0() + Duration::minutes(5)).timestamp_millis())
        );

        let res = cl
            .post(format!("{root_url}/api/auth/verify"))
            .json(&json!({
                "address": wallet.checksummed_address(),
                "signature": wallet.sign_message(&message),
                "message": message,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::OK);

        let session = res.json::<serde_json::Value>().await.unwrap();
        let token = session["token"].as_str().unwrap().to_string();
        let address = wallet.wallet_address().to_string();

        assert_eq!(
            session,
            json!({
                "success": true,
                "token": token,
                "address": address,
                "expiresIn": "7d",
            })
        );

        let res = cl
            .get(format!("{root_url}/api/auth/me"))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::OK);
        assert_eq!(
            res.json::<serde_json::Value>().await.unwrap(),
            json!({
                "address": address,
                "message": "Authentication successful",
            })
        );
    };

    await_client_server_flow!(harness.api_server_run(), client);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_replayed_proof_is_rejected() {
    let harness = ServerSideHarness::new(ServerSideHarnessOptions::default()).await;
    let root_url = harness.root_url();
    let wallet = EvmTestWallet::from_seed(1);

    let client = async move {
        let cl = reqwest::Client::new();

        let message = request_challenge(&cl, &root_url, &wallet.checksummed_address()).await;
        let proof = json!({
            "address": wallet.checksummed_address(),
            "signature": wallet.sign_message(&message),
            "message": message,
        });

        let res = cl
            .post(format!("{root_url}/api/auth/verify"))
            .json(&proof)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::OK);

        let res = cl
            .post(format!("{root_url}/api/auth/verify"))
            .json(&proof)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(error_kind(res).await, "ChallengeNotFound");
    };

    await_client_server_flow!(harness.api_server_run(), client);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_expired_challenge_is_rejected() {
    let harness = ServerSideHarness::new(ServerSideHarnessOptions::default()).await;
    let root_url = harness.root_url();
    let time_source = harness.time_source();
    let wallet = EvmTestWallet::from_seed(1);

    let client = async move {
        let cl = reqwest::Client::new();

        let message = request_challenge(&cl, &root_url, &wallet.checksummed_address()).await;

        time_source.advance(Duration::minutes(6));

        let res = cl
            .post(format!("{root_url}/api/auth/verify"))
            .json(&json!({
                "address": wallet.checksummed_address(),
                "signature": wallet.sign_message(&message),
                "message": message,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(error_kind(res).await, "ChallengeExpired");
    };

    await_client_server_flow!(harness.api_server_run(), client);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_validation_errors() {
    let harness = ServerSideHarness::new(ServerSideHarnessOptions::default()).await;
    let root_url = harness.root_url();
    let wallet = EvmTestWallet::from_seed(1);

    let client = async move {
        let cl = reqwest::Client::new();

        let cases = [
            ("nonce", json!({}), "MissingParameters"),
            ("nonce", json!({ "address": "0x123" }), "InvalidIdentity"),
            (
                "verify",
                json!({ "address": wallet.checksummed_address(), "signature": "0x00" }),
                "MissingParameters",
            ),
            (
                "verify",
                json!({ "address": "nope", "signature": "0x00", "message": "m" }),
                "InvalidIdentity",
            ),
            (
                "verify",
                json!({ "address": wallet.checksummed_address(), "signature": "0x00", "message": "m" }),
                "InvalidSignatureFormat",
            ),
        ];

        for (route, body, expected_kind) in cases {
            let res = cl
                .post(format!("{root_url}/api/auth/{route}"))
                .json(&body)
                .send()
                .await
                .unwrap();

            assert_eq!(res.status(), http::StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(error_kind(res).await, expected_kind, "{body}");
        }

        let res = cl
            .post(format!("{root_url}/api/auth/nonce"))
            .header("Content-Type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(error_kind(res).await, "InvalidRequest");
    };

    await_client_server_flow!(harness.api_server_run(), client);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_proof_rejections() {
    let harness = ServerSideHarness::new(ServerSideHarnessOptions::default()).await;
    let root_url = harness.root_url();
    let wallet = EvmTestWallet::from_seed(1);
    let intruder = EvmTestWallet::from_seed(2);

    let client = async move {
        let cl = reqwest::Client::new();

        // No pending challenge
        let res = cl
            .post(format!("{root_url}/api/auth/verify"))
            .json(&json!({
                "address": wallet.checksummed_address(),
                "signature": wallet.sign_message("hello"),
                "message": "hello",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(error_kind(res).await, "ChallengeNotFound");

        let message = request_challenge(&cl, &root_url, &wallet.checksummed_address()).await;

        // Message without the issued nonce
        let res = cl
            .post(format!("{root_url}/api/auth/verify"))
            .json(&json!({
                "address": wallet.checksummed_address(),
                "signature": wallet.sign_message("hello"),
                "message": "hello",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(error_kind(res).await, "NonceMismatch");

        // Signed by someone else
        let res = cl
            .post(format!("{root_url}/api/auth/verify"))
            .json(&json!({
                "address": wallet.checksummed_address(),
                "signature": intruder.sign_message(&message),
                "message": message,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(error_kind(res).await, "SignatureInvalid");
    };

    await_client_server_flow!(harness.api_server_run(), client);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_me_rejections() {
    let harness = ServerSideHarness::new(ServerSideHarnessOptions::default()).await;
    let root_url = harness.root_url();

    let client = async move {
        let cl = reqwest::Client::new();

        let res = cl
            .get(format!("{root_url}/api/auth/me"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(error_kind(res).await, "TokenMissing");

        let res = cl
            .get(format!("{root_url}/api/auth/me"))
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(error_kind(res).await, "TokenMissing");

        let res = cl
            .get(format!("{root_url}/api/auth/me"))
            .bearer_auth("not-a-token")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(error_kind(res).await, "TokenMalformed");

        let res = cl
            .get(format!("{root_url}/api/auth/me"))
            .bearer_auth("a.b.c")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(error_kind(res).await, "TokenInvalidSignature");
    };

    await_client_server_flow!(harness.api_server_run(), client);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_internal_error_has_empty_body() {
    let mut mock_signature_verifier = MockWalletSignatureVerifier::new();
    mock_signature_verifier
        .expect_verify()
        .returning(|_, _, _| InternalError::bail("Verifier unavailable"));

    let harness = ServerSideHarness::new(ServerSideHarnessOptions {
        mock_signature_verifier: Some(mock_signature_verifier),
    })
    .await;
    let root_url = harness.root_url();
    let wallet = EvmTestWallet::from_seed(1);

    let client = async move {
        let cl = reqwest::Client::new();

        let message = request_challenge(&cl, &root_url, &wallet.checksummed_address()).await;

        let res = cl
            .post(format!("{root_url}/api/auth/verify"))
            .json(&json!({
                "address": wallet.checksummed_address(),
                "signature": wallet.sign_message(&message),
                "message": message,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.text().await.unwrap(), "");
    };

    await_client_server_flow!(harness.api_server_run(), client);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Helpers
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

async fn request_challenge(cl: &reqwest::Client, root_url: &str, address: &str) -> String {
    let res = cl
        .post(format!("{root_url}/api/auth/nonce"))
        .json(&json!({ "address": address }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), http::StatusCode::OK);

    let body = res.json::<serde_json::Value>().await.unwrap();
    body["message"].as_str().unwrap().to_string()
}

async fn error_kind(res: reqwest::Response) -> String {
    let body = res.json::<serde_json::Value>().await.unwrap();
    body["kind"].as_str().unwrap().to_string()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
