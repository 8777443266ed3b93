// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};

use pretty_assertions::assert_eq;
use serde_json::json;
use wallet_auth::testing::EvmTestWallet;
use wallet_auth_server::config::{ENV_VAR_JWT_EXPIRES_IN, ENV_VAR_JWT_SECRET, ServerConfig};
use wallet_auth_server::{APIServer, configure_catalog};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

async fn start_server(vars: &[(&str, &str)]) -> (String, tokio::task::JoinHandle<()>) {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    let config = ServerConfig::load(|name| vars.get(name).cloned(), false).unwrap();

    let api_server = APIServer::new(
        configure_catalog(config),
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        0,
    )
    .await
    .unwrap();

    let root_url = format!("http://{}", api_server.local_addr());
    let handle = tokio::spawn(async move {
        api_server.run(std::future::pending()).await.unwrap();
    });

    (root_url, handle)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_health() {
    let (root_url, handle) = start_server(&[(ENV_VAR_JWT_SECRET, "s3cr3t")]).await;

    let res = reqwest::get(format!("{root_url}/health")).await.unwrap();
    assert_eq!(res.status(), http::StatusCode::OK);

    let body = res.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["status"], json!("ok"));
    assert!(body["timestamp"].as_i64().unwrap() > 0);

    handle.abort();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_sign_in_with_configured_ttl() {
    let (root_url, handle) = start_server(&[
        (ENV_VAR_JWT_SECRET, "s3cr3t"),
        (ENV_VAR_JWT_EXPIRES_IN, "24h"),
    ])
    .await;

    let wallet = EvmTestWallet::from_seed(7);
    let cl = reqwest::Client::new();

    let challenge = cl
        .post(format!("{root_url}/api/auth/nonce"))
        .json(&json!({ "address": wallet.checksummed_address() }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    let message = challenge["message"].as_str().unwrap().to_string();
    assert!(message.contains("localhost:3000 wants you to sign in"));

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
    assert_eq!(session["expiresIn"], json!("24h"));
    assert_eq!(session["address"], json!(wallet.wallet_address().to_string()));

    let res = cl
        .get(format!("{root_url}/api/auth/me"))
        .bearer_auth(session["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), http::StatusCode::OK);

    handle.abort();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_token_from_another_secret_is_rejected() {
    let (root_url_a, handle_a) = start_server(&[(ENV_VAR_JWT_SECRET, "secret-a")]).await;
    let (root_url_b, handle_b) = start_server(&[(ENV_VAR_JWT_SECRET, "secret-b")]).await;

    let wallet = EvmTestWallet::from_seed(8);
    let cl = reqwest::Client::new();

    let challenge = cl
        .post(format!("{root_url_a}/api/auth/nonce"))
        .json(&json!({ "address": wallet.checksummed_address() }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    let message = challenge["message"].as_str().unwrap().to_string();

    let session = cl
        .post(format!("{root_url_a}/api/auth/verify"))
        .json(&json!({
            "address": wallet.checksummed_address(),
            "signature": wallet.sign_message(&message),
            "message": message,
        }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    let token = session["token"].as_str().unwrap();

    let res = cl
        .get(format!("{root_url_b}/api/auth/me"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.json::<serde_json::Value>().await.unwrap()["kind"],
        json!("TokenInvalidSignature")
    );

    handle_a.abort();
    handle_b.abort();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
