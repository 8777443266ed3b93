// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// All routes of the service, without the cross-cutting layers
pub fn root_router() -> axum::Router {
    axum::Router::new()
        .nest("/api/auth", crate::auth::auth_router())
        .route("/health", axum::routing::get(crate::health_handler))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
