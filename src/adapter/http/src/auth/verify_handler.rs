// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use dill::Catalog;
use http_common::{ApiError, ResultIntoApiError};
use internal_error::ResultIntoInternal;
use serde::{Deserialize, Serialize};
use wallet_auth::WalletAuthService;

use crate::axum_utils::{missing_parameters_error, request_body};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub address: Option<String>,
    pub signature: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub token: String,
    /// Lowercase form of the authenticated wallet
    pub address: String,
    pub expires_in: String,
}

/// Exchanges a signed challenge for a session token
#[tracing::instrument(level = "info", skip_all)]
pub async fn verify_handler(
    Extension(catalog): Extension<Catalog>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let request = request_body(payload)?;
    let (Some(address), Some(signature), Some(message)) =
        (request.address, request.signature, request.message)
    else {
        return Err(missing_parameters_error());
    };

    let wallet_auth_service = catalog.get_one::<dyn WalletAuthService>().int_err()?;

    let session = wallet_auth_service
        .submit_proof(&address, &signature, &message)
        .await
        .api_err()?;

    Ok(Json(VerifyResponse {
        success: true,
        token: session.token.into_inner(),
        address: session.wallet_address.to_string(),
        expires_in: session.expires_in,
    }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
