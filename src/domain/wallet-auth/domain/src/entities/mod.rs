// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod challenge_message;
mod challenge_nonce;
mod evm_wallet_address;
mod evm_wallet_signature;
mod session_token;
mod session_ttl;
mod wallet_auth_challenge;

pub use challenge_message::*;
pub use challenge_nonce::*;
pub use evm_wallet_address::*;
pub use evm_wallet_signature::*;
pub use session_token::*;
pub use session_ttl::*;
pub use wallet_auth_challenge::*;
