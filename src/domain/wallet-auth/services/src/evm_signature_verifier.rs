// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use alloy_primitives::Signature;
use internal_error::{InternalError, ResultIntoInternal};
use wallet_auth::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// `personal_sign` (EIP-191) verification over secp256k1 via address recovery
#[dill::component(pub)]
#[dill::interface(dyn WalletSignatureVerifier)]
pub struct EvmSignatureVerifier {}

#[async_trait::async_trait]
impl WalletSignatureVerifier for EvmSignatureVerifier {
    #[tracing::instrument(level = "debug", skip_all, fields(%wallet))]
    async fn verify(
        &self,
        wallet: &EvmWalletAddress,
        message: &str,
        signature: &EvmWalletSignature,
    ) -> Result<bool, InternalError> {
        let signature_bytes = alloy_primitives::hex::decode(signature.as_str()).int_err()?;

        let Ok(signature) = Signature::from_raw(&signature_bytes) else {
            tracing::debug!("Signature bytes do not form a recoverable signature");
            return Ok(false);
        };

        match signature.recover_address_from_msg(message) {
            Ok(recovered) => Ok(recovered == wallet.to_address()),
            Err(e) => {
                tracing::debug!(error = %e, "Signer address recovery failed");
                Ok(false)
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
