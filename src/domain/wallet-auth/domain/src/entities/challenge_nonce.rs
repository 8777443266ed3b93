// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::LazyLock;

use rand::RngCore;
use regex::Regex;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const CHALLENGE_NONCE_BYTES: usize = 32;

static CHALLENGE_NONCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[0-9a-f]{64}$").unwrap());

/// 256-bit random value in lowercase hex
#[nutype::nutype(
    validate(regex = CHALLENGE_NONCE_REGEX),
    derive(AsRef, Clone, Debug, Deref, Display, Eq, PartialEq, TryFrom)
)]
pub struct ChallengeNonce(String);

impl ChallengeNonce {
    pub fn new() -> Self {
        let mut bytes = [0u8; CHALLENGE_NONCE_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);

        Self::try_new(alloy_primitives::hex::encode(bytes)).expect("Invalid nonce generated")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
