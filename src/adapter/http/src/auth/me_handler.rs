// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::{Extension, Json};
use dill::Catalog;
use http_common::{ApiError, ResultIntoApiError};
use internal_error::ResultIntoInternal;
use serde::{Deserialize, Serialize};
use wallet_auth::WalletAuthService;

use crate::axum_utils::{bearer_token, missing_token_error};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub address: String,
    pub message: String,
}

/// Resolves the wallet behind a bearer session token
#[tracing::instrument(level = "debug", skip_all)]
pub async fn me_handler(
    Extension(catalog): Extension<Catalog>,
    headers: http::HeaderMap,
) -> Result<Json<MeResponse>, ApiError> {
    let token = bearer_token(&headers).ok_or_else(missing_token_error)?;

    let wallet_auth_service = catalog.get_one::<dyn WalletAuthService>().int_err()?;

    let wallet_address = wallet_auth_service
        .validate_session(token)
        .await
        .api_err()?;

    Ok(Json(MeResponse {
        address: wallet_address.to_string(),
        message: "Authentication successful".to_string(),
    }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
