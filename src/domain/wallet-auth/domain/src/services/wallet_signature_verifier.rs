// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;

use crate::{EvmWalletAddress, EvmWalletSignature};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Checks that `signature` over `message` was produced by the key of `wallet`.
///
/// A cryptographic mismatch is `Ok(false)`, errors are reserved for failures
/// of the verifier itself.
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait WalletSignatureVerifier: Send + Sync {
    async fn verify(
        &self,
        wallet: &EvmWalletAddress,
        message: &str,
        signature: &EvmWalletSignature,
    ) -> Result<bool, InternalError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
