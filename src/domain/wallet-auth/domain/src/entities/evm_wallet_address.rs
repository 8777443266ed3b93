// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;
use std::sync::LazyLock;

use alloy_primitives::Address;
use regex::Regex;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

static EVM_WALLET_ADDRESS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^0x[0-9a-f]{40}$").unwrap());

/// Normalized (lowercase) EVM wallet address: `0x` followed by 40 hex digits.
///
/// Input is accepted in any letter case after the literal `0x` prefix.
#[nutype::nutype(
    sanitize(with = normalize_wallet_address),
    validate(regex = EVM_WALLET_ADDRESS_REGEX),
    derive(AsRef, Clone, Debug, Deref, Display, Eq, PartialEq, Hash)
)]
pub struct EvmWalletAddress(String);

fn normalize_wallet_address(value: String) -> String {
    match value.strip_prefix("0x") {
        Some(hex_part) => format!("0x{}", hex_part.to_ascii_lowercase()),
        None => value,
    }
}

impl EvmWalletAddress {
    pub fn parse(value: &str) -> Result<Self, InvalidWalletAddressError> {
        Self::try_new(value.to_string()).map_err(|_| InvalidWalletAddressError {
            value: value.to_string(),
        })
    }

    pub fn from_address(address: Address) -> Self {
        Self::try_new(format!("0x{}", alloy_primitives::hex::encode(address)))
            .expect("Hex-encoded address is always valid")
    }

    pub fn to_address(&self) -> Address {
        Address::from_str(self.as_str()).expect("Validated address is always parseable")
    }

    /// EIP-55 mixed-case representation
    pub fn checksummed(&self) -> String {
        self.to_address().to_checksum(None)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid wallet address: '{value}'")]
pub struct InvalidWalletAddressError {
    pub value: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
