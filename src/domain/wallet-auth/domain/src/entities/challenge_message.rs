// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::WalletAuthChallenge;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const NONCE_LINE_PREFIX: &str = "Nonce: ";

const SIGN_IN_STATEMENT: &str = "Welcome to our DApp! Please sign this message to verify your identity.";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Human-readable challenge in the EIP-4361 "Sign-In with Ethereum" layout.
///
/// Rendering is deterministic for the same challenge and domain. The server
/// never compares a returned message byte-for-byte with a fresh rendering, it
/// only requires the issued nonce to be present in the signed text.
pub struct ChallengeMessage;

impl ChallengeMessage {
    pub fn render(challenge: &WalletAuthChallenge, domain: &str) -> String {
        indoc::formatdoc!(
            "
            {domain} wants you to sign in with your Ethereum account:
            {address}

            {statement}

            URI: https://{domain}
            Version: 1
            Chain ID: 1
            {nonce_prefix}{nonce}
            Issued At: {issued_at}
            Expiration Time: {expires_at}",
            domain = domain,
            address = challenge.wallet_address.checksummed(),
            statement = SIGN_IN_STATEMENT,
            nonce_prefix = NONCE_LINE_PREFIX,
            nonce = challenge.nonce,
            issued_at = format_timestamp(challenge.issued_at),
            expires_at = format_timestamp(challenge.expires_at),
        )
    }

    pub fn extract_nonce(message: &str) -> Option<&str> {
        message
            .lines()
            .find_map(|line| line.strip_prefix(NONCE_LINE_PREFIX))
            .map(str::trim)
            .filter(|nonce| !nonce.is_empty())
    }
}

fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
