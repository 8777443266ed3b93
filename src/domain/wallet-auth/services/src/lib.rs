// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod dependencies;
mod evm_signature_verifier;
mod session_token_service_impl;
mod wallet_auth_service_impl;

pub use dependencies::*;
pub use evm_signature_verifier::*;
pub use session_token_service_impl::*;
pub use wallet_auth_service_impl::*;
