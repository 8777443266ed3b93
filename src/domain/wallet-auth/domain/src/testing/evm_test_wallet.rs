// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use alloy_primitives::Address;
use k256::ecdsa::SigningKey;

use crate::EvmWalletAddress;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Deterministic secp256k1 wallet that signs like `personal_sign` (EIP-191)
pub struct EvmTestWallet {
    signing_key: SigningKey,
}

impl EvmTestWallet {
    /// `seed` must be in `1..=0x7f` to stay below the curve order
    pub fn from_seed(seed: u8) -> Self {
        assert!((1..=0x7f).contains(&seed), "Unsupported seed: {seed}");

        let signing_key = SigningKey::from_slice(&[seed; 32]).unwrap();

        Self { signing_key }
    }

    pub fn address(&self) -> Address {
        Address::from_private_key(&self.signing_key)
    }

    /// EIP-55 form, as a wallet UI would present it
    pub fn checksummed_address(&self) -> String {
        self.address().to_checksum(None)
    }

    pub fn wallet_address(&self) -> EvmWalletAddress {
        EvmWalletAddress::from_address(self.address())
    }

    /// `0x`-prefixed `r || s || v` with `v` in `{27, 28}`
    pub fn sign_message(&self, message: &str) -> String {
        let prehash = alloy_primitives::eip191_hash_message(message);
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(prehash.as_slice())
            .unwrap();

        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(27 + recovery_id.to_byte());

        format!("0x{}", alloy_primitives::hex::encode(bytes))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
