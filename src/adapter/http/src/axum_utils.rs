// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use http_common::ApiError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const BEARER_PREFIX: &str = "Bearer ";

/// Token of an `Authorization: Bearer <token>` header, if any
pub(crate) fn bearer_token(headers: &http::HeaderMap) -> Option<&str> {
    headers
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) fn request_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::bad_request(e).with_kind("InvalidRequest"))
}

pub(crate) fn missing_parameters_error() -> ApiError {
    ApiError::new_bad_request_with_reason("Missing required parameters").with_kind("MissingParameters")
}

pub(crate) fn missing_token_error() -> ApiError {
    ApiError::new_unauthorized_with_reason("Unauthorized: missing token").with_kind("TokenMissing")
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
