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
use hmac::{Hmac, Mac};
use internal_error::{InternalError, ResultIntoInternal};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use time_source::SystemTimeSource;
use wallet_auth::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

type HmacSha256 = Hmac<Sha256>;

const SESSION_TOKEN_ALGORITHM: &str = "HS256";
const SESSION_TOKEN_TYPE: &str = "JWT";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Stateless HS256 tokens: `b64(header).b64(claims).b64(hmac)`, base64url
/// without padding
pub struct SessionTokenServiceImpl {
    mac: HmacSha256,
    time_source: Arc<dyn SystemTimeSource>,
}

#[dill::component(pub)]
#[dill::interface(dyn SessionTokenService)]
impl SessionTokenServiceImpl {
    pub fn new(config: Arc<SessionTokenConfig>, time_source: Arc<dyn SystemTimeSource>) -> Self {
        let mac = HmacSha256::new_from_slice(config.secret.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");

        Self { mac, time_source }
    }

    fn sign(&self, signing_input: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(signing_input.as_bytes());

        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }

    fn encode_segment<T: Serialize>(value: &T) -> Result<String, InternalError> {
        let json = serde_json::to_vec(value).int_err()?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, SessionTokenError> {
        let json = URL_SAFE_NO_PAD
            .decode(segment)
            .map_err(|_| SessionTokenError::Malformed)?;

        serde_json::from_slice(&json).map_err(|_| SessionTokenError::Malformed)
    }
}

impl SessionTokenService for SessionTokenServiceImpl {
    #[tracing::instrument(level = "debug", skip_all, fields(%wallet, %ttl))]
    fn issue_token(
        &self,
        wallet: &EvmWalletAddress,
        ttl: &SessionTtl,
    ) -> Result<SessionToken, InternalError> {
        let now = self.time_source.now();

        let exp = match ttl.duration() {
            Some(duration) => {
                let Some(expires_at) = now.checked_add_signed(duration) else {
                    return InternalError::bail(format!(
                        "Session TTL '{ttl}' is out of the supported time range"
                    ));
                };
                Some(expires_at.timestamp())
            }
            None => None,
        };

        let claims = SessionTokenClaims {
            address: wallet.to_string(),
            iat: now.timestamp(),
            exp,
        };

        let header = Self::encode_segment(&SessionTokenHeader {
            alg: SESSION_TOKEN_ALGORITHM.to_string(),
            typ: SESSION_TOKEN_TYPE.to_string(),
        })?;
        let payload = Self::encode_segment(&claims)?;

        let signing_input = format!("{header}.{payload}");
        let signature = self.sign(&signing_input);

        Ok(SessionToken::new(format!("{signing_input}.{signature}")))
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn verify_token(&self, token: &str) -> Result<SessionTokenClaims, SessionTokenError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(SessionTokenError::Malformed);
        };

        let signing_input = &token[..header.len() + 1 + payload.len()];
        let expected_signature = self.sign(signing_input);

        let signature_matches: bool = expected_signature
            .as_bytes()
            .ct_eq(signature.as_bytes())
            .into();
        if !signature_matches {
            return Err(SessionTokenError::InvalidSignature);
        }

        let header: SessionTokenHeader = Self::decode_segment(header)?;
        if header.alg != SESSION_TOKEN_ALGORITHM {
            return Err(SessionTokenError::Malformed);
        }

        let claims: SessionTokenClaims = Self::decode_segment(payload)?;

        let now = self.time_source.now().timestamp();
        if claims.exp.is_some_and(|exp| now > exp) {
            return Err(SessionTokenError::Expired);
        }

        Ok(claims)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Serialize, Deserialize)]
struct SessionTokenHeader {
    alg: String,
    typ: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
