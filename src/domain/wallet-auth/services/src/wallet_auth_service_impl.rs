// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use internal_error::ResultIntoInternal;
use time_source::SystemTimeSource;
use wallet_auth::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[dill::component(pub)]
#[dill::interface(dyn WalletAuthService)]
pub struct WalletAuthServiceImpl {
    challenge_repo: Arc<dyn WalletAuthChallengeRepository>,
    signature_verifier: Arc<dyn WalletSignatureVerifier>,
    session_token_service: Arc<dyn SessionTokenService>,
    time_source: Arc<dyn SystemTimeSource>,
    config: Arc<WalletAuthConfig>,
}

impl WalletAuthServiceImpl {
    async fn discard_challenge(
        &self,
        challenge: &WalletAuthChallenge,
    ) -> Result<(), SubmitProofError> {
        match self
            .challenge_repo
            .consume_challenge(&challenge.wallet_address, &challenge.nonce)
            .await
        {
            // Already gone or replaced by a newer challenge
            Ok(()) | Err(ConsumeChallengeError::NotFound(_)) => Ok(()),
            Err(ConsumeChallengeError::Internal(e)) => Err(e.into()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl WalletAuthService for WalletAuthServiceImpl {
    #[tracing::instrument(level = "info", skip_all, fields(%wallet_address))]
    async fn request_challenge(
        &self,
        wallet_address: &str,
    ) -> Result<IssuedChallenge, RequestChallengeError> {
        let wallet_address = EvmWalletAddress::parse(wallet_address)?;
        let now = self.time_source.now();

        let challenge = WalletAuthChallenge::new(wallet_address, now, self.config.challenge_ttl);

        self.challenge_repo
            .set_challenge(&challenge)
            .await
            .int_err()?;

        let cleaned_up = self
            .challenge_repo
            .cleanup_expired_challenges(now)
            .await
            .int_err()?;
        if cleaned_up > 0 {
            tracing::debug!(cleaned_up, "Removed expired challenges");
        }

        let message = ChallengeMessage::render(&challenge, &self.config.domain);

        Ok(IssuedChallenge {
            message,
            nonce: challenge.nonce,
            issued_at: challenge.issued_at,
            expires_at: challenge.expires_at,
        })
    }

    #[tracing::instrument(level = "info", skip_all, fields(%wallet_address))]
    async fn submit_proof(
        &self,
        wallet_address: &str,
        signature: &str,
        message: &str,
    ) -> Result<AuthenticatedSession, SubmitProofError> {
        let wallet_address = EvmWalletAddress::parse(wallet_address)?;
        let signature = EvmWalletSignature::parse(signature)?;

        let challenge = match self.challenge_repo.get_challenge(&wallet_address).await {
            Ok(challenge) => challenge,
            Err(GetChallengeError::NotFound(e)) => {
                tracing::warn!("No pending challenge");
                return Err(e.into());
            }
            Err(GetChallengeError::Internal(e)) => return Err(e.into()),
        };

        let now = self.time_source.now();
        if challenge.is_expired_at(now) {
            tracing::warn!(expires_at = %challenge.expires_at, "Challenge expired");
            self.discard_challenge(&challenge).await?;
            return Err(SubmitProofError::ChallengeExpired {
                wallet: wallet_address,
            });
        }

        if !message.contains(challenge.nonce.as_str()) {
            tracing::warn!(
                has_nonce_line = ChallengeMessage::extract_nonce(message).is_some(),
                "Signed message does not carry the issued nonce"
            );
            return Err(SubmitProofError::NonceMismatch);
        }

        let is_valid = self
            .signature_verifier
            .verify(&wallet_address, message, &signature)
            .await?;
        if !is_valid {
            tracing::warn!("Signature rejected");
            return Err(SubmitProofError::SignatureInvalid);
        }

        // The nonce guard makes a concurrent submission of the same proof,
        // or a re-issue in between, lose here
        match self
            .challenge_repo
            .consume_challenge(&wallet_address, &challenge.nonce)
            .await
        {
            Ok(()) => {}
            Err(ConsumeChallengeError::NotFound(e)) => {
                tracing::warn!("Challenge consumed concurrently");
                return Err(e.into());
            }
            Err(ConsumeChallengeError::Internal(e)) => return Err(e.into()),
        }

        let session_ttl = &self.config.session_ttl;
        let token = self
            .session_token_service
            .issue_token(&wallet_address, session_ttl)?;

        tracing::info!("Wallet authenticated");

        Ok(AuthenticatedSession {
            token,
            wallet_address,
            expires_in: session_ttl.to_string(),
        })
    }

    #[tracing::instrument(level = "debug", skip_all)]
    async fn validate_session(
        &self,
        token: &str,
    ) -> Result<EvmWalletAddress, ValidateSessionError> {
        let claims = self
            .session_token_service
            .verify_token(token)
            .inspect_err(|e| tracing::debug!(kind = e.kind(), "Session token rejected"))?;

        // A correctly signed token always carries an address we issued
        EvmWalletAddress::parse(&claims.address)
            .map_err(|_| ValidateSessionError::Unauthorized(SessionTokenError::Malformed))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
