// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

static EVM_WALLET_SIGNATURE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^0x[0-9a-fA-F]{130}$").unwrap());

/// 65-byte recoverable secp256k1 signature (`r || s || v`) in hex form
#[nutype::nutype(
    validate(regex = EVM_WALLET_SIGNATURE_REGEX),
    derive(AsRef, Clone, Debug, Deref, Display, Eq, PartialEq)
)]
pub struct EvmWalletSignature(String);

impl EvmWalletSignature {
    pub fn parse(value: &str) -> Result<Self, InvalidSignatureFormatError> {
        Self::try_new(value.to_string()).map_err(|_| InvalidSignatureFormatError)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid signature format")]
pub struct InvalidSignatureFormatError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
