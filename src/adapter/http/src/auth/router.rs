// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn auth_router() -> axum::Router {
    axum::Router::new()
        .route("/nonce", axum::routing::post(super::nonce_handler))
        .route("/verify", axum::routing::post(super::verify_handler))
        .route("/me", axum::routing::get(super::me_handler))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
