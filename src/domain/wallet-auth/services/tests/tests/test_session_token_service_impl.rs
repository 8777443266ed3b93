// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use pretty_assertions::assert_eq;
use sha2::Sha256;
use time_source::{SystemTimeSource, SystemTimeSourceStub};
use wallet_auth::*;
use wallet_auth_services::SessionTokenServiceImpl;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const SECRET: &str = "test-secret";
const WALLET: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_issue_and_verify() {
    let harness = SessionTokenHarness::new(SECRET);
    let iat = harness.time_source.now().timestamp();

    let token = harness
        .session_token_service
        .issue_token(&wallet(), &SessionTtl::parse("7d"))
        .unwrap();

    assert!(
        token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    );

    assert_eq!(
        harness.session_token_service.verify_token(token.as_str()),
        Ok(SessionTokenClaims {
            address: WALLET.to_string(),
            iat,
            exp: Some(iat + 7 * 24 * 60 * 60),
        })
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_expiry() {
    let harness = SessionTokenHarness::new(SECRET);

    let token = harness
        .session_token_service
        .issue_token(&wallet(), &SessionTtl::parse("1h"))
        .unwrap();

    harness.time_source.advance(Duration::hours(1));
    assert!(
        harness
            .session_token_service
            .verify_token(token.as_str())
            .is_ok()
    );

    harness.time_source.advance(Duration::seconds(1));
    assert_eq!(
        harness.session_token_service.verify_token(token.as_str()),
        Err(SessionTokenError::Expired)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_unrecognized_ttl_never_expires() {
    let harness = SessionTokenHarness::new(SECRET);
    let iat = harness.time_source.now().timestamp();

    let token = harness
        .session_token_service
        .issue_token(&wallet(), &SessionTtl::parse("forever"))
        .unwrap();

    harness.time_source.advance(Duration::days(100 * 365));

    assert_eq!(
        harness.session_token_service.verify_token(token.as_str()),
        Ok(SessionTokenClaims {
            address: WALLET.to_string(),
            iat,
            exp: None,
        })
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_tampered_signature() {
    let harness = SessionTokenHarness::new(SECRET);

    let token = harness
        .session_token_service
        .issue_token(&wallet(), &SessionTtl::parse("7d"))
        .unwrap();

    let (signing_input, signature) = token.as_str().rsplit_once('.').unwrap();
    let first = signature.chars().next().unwrap();
    let replacement = if first == 'A' { 'B' } else { 'A' };
    let tampered = format!("{signing_input}.{replacement}{}", &signature[1..]);

    assert_eq!(
        harness.session_token_service.verify_token(&tampered),
        Err(SessionTokenError::InvalidSignature)
    );

    let truncated = &token.as_str()[..token.as_str().len() - 1];
    assert_eq!(
        harness.session_token_service.verify_token(truncated),
        Err(SessionTokenError::InvalidSignature)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_tampered_payload() {
    let harness = SessionTokenHarness::new(SECRET);

    let token = harness
        .session_token_service
        .issue_token(&wallet(), &SessionTtl::parse("7d"))
        .unwrap();

    let segments: Vec<_> = token.as_str().split('.').collect();
    let forged_payload = URL_SAFE_NO_PAD.encode(
        br#"{"address":"0x1111111111111111111111111111111111111111","iat":0}"#,
    );
    let tampered = format!("{}.{forged_payload}.{}", segments[0], segments[2]);

    assert_eq!(
        harness.session_token_service.verify_token(&tampered),
        Err(SessionTokenError::InvalidSignature)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_foreign_secret() {
    let issuer = SessionTokenHarness::new("another-secret");
    let verifier = SessionTokenHarness::new(SECRET);

    let token = issuer
        .session_token_service
        .issue_token(&wallet(), &SessionTtl::parse("7d"))
        .unwrap();

    assert_eq!(
        verifier.session_token_service.verify_token(token.as_str()),
        Err(SessionTokenError::InvalidSignature)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_expired_token_with_bad_signature_reports_signature() {
    let harness = SessionTokenHarness::new(SECRET);

    let token = harness
        .session_token_service
        .issue_token(&wallet(), &SessionTtl::parse("1s"))
        .unwrap();
    harness.time_source.advance(Duration::days(1));

    let (signing_input, _) = token.as_str().rsplit_once('.').unwrap();
    let tampered = format!("{signing_input}.{}", sign(SECRET, "unrelated"));

    assert_eq!(
        harness.session_token_service.verify_token(&tampered),
        Err(SessionTokenError::InvalidSignature)
    );
    assert_eq!(
        harness.session_token_service.verify_token(token.as_str()),
        Err(SessionTokenError::Expired)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_malformed() {
    let harness = SessionTokenHarness::new(SECRET);

    for token in ["", "abc", "a.b", "a.b.c.d", "..."] {
        assert_eq!(
            harness.session_token_service.verify_token(token),
            Err(SessionTokenError::Malformed),
            "{token:?}"
        );
    }

    // Correctly signed, but carries garbage
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(b"not json");
    let signing_input = format!("{header}.{payload}");
    let token = format!("{signing_input}.{}", sign(SECRET, &signing_input));
    assert_eq!(
        harness.session_token_service.verify_token(&token),
        Err(SessionTokenError::Malformed)
    );

    // Correctly signed, but claims another algorithm
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"address":"{WALLET}","iat":0}}"#));
    let signing_input = format!("{header}.{payload}");
    let token = format!("{signing_input}.{}", sign(SECRET, &signing_input));
    assert_eq!(
        harness.session_token_service.verify_token(&token),
        Err(SessionTokenError::Malformed)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_token_layout() {
    let harness = SessionTokenHarness::new(SECRET);

    let token = harness
        .session_token_service
        .issue_token(&wallet(), &SessionTtl::parse("7d"))
        .unwrap();

    let segments: Vec<_> = token.as_str().split('.').collect();
    assert_eq!(segments.len(), 3);

    let header = URL_SAFE_NO_PAD.decode(segments[0]).unwrap();
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&header).unwrap(),
        serde_json::json!({"alg": "HS256", "typ": "JWT"})
    );

    let signing_input = format!("{}.{}", segments[0], segments[1]);
    assert_eq!(segments[2], sign(SECRET, &signing_input));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Harness
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct SessionTokenHarness {
    session_token_service: Arc<dyn SessionTokenService>,
    time_source: Arc<SystemTimeSourceStub>,
}

impl SessionTokenHarness {
    fn new(secret: &str) -> Self {
        let catalog = {
            let mut b = dill::CatalogBuilder::new();

            b.add::<SessionTokenServiceImpl>()
                .add_value(SessionTokenConfig::new(secret))
                .add_value(SystemTimeSourceStub::new_set(
                    Utc.with_ymd_and_hms(2050, 1, 2, 12, 0, 0).unwrap(),
                ))
                .bind::<dyn SystemTimeSource, SystemTimeSourceStub>();

            b.build()
        };

        Self {
            session_token_service: catalog.get_one().unwrap(),
            time_source: catalog.get_one().unwrap(),
        }
    }
}

fn wallet() -> EvmWalletAddress {
    EvmWalletAddress::parse(WALLET).unwrap()
}

fn sign(secret: &str, signing_input: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(signing_input.as_bytes());

    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
