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
pub struct NonceRequest {
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceResponse {
    /// Text the wallet is asked to sign
    pub message: String,
    pub nonce: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Milliseconds since the Unix epoch
    pub expires_at: i64,
}

/// Issues a sign-in challenge for a wallet
#[tracing::instrument(level = "info", skip_all)]
pub async fn nonce_handler(
    Extension(catalog): Extension<Catalog>,
    payload: Result<Json<NonceRequest>, JsonRejection>,
) -> Result<Json<NonceResponse>, ApiError> {
    let request = request_body(payload)?;
    let Some(address) = request.address else {
        return Err(missing_parameters_error());
    };

    let wallet_auth_service = catalog.get_one::<dyn WalletAuthService>().int_err()?;

    let issued = wallet_auth_service
        .request_challenge(&address)
        .await
        .api_err()?;

    Ok(Json(NonceResponse {
        message: issued.message,
        nonce: issued.nonce.to_string(),
        timestamp: issued.issued_at.timestamp_millis(),
        expires_at: issued.expires_at.timestamp_millis(),
    }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
