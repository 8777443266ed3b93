// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wallet_auth::{
    RequestChallengeError,
    SubmitProofError,
    ValidateSessionError,
    WalletAuthErrorCategory,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Unifies error handling and logging of HTTP handlers.
///
/// The typical usage pattern is:
///
/// ```
/// async fn handler() -> Result<(), ApiError> {
///     operation().await.api_err()?;
///     Ok(())
/// }
/// ````
///
/// Conversion from domain errors is explicit via [`IntoApiError`] rather than
/// [From], so that putting a question mark on a fallible operation always
/// states what it will turn into. Domain errors get their status code from
/// the [`ApiErrorCategorizable`] trait.
#[derive(Debug, Error)]
#[error("api error {status_code:?}")]
pub struct ApiError {
    pub status_code: http::StatusCode,
    /// Stable machine-readable error kind reported to clients
    pub kind: Option<&'static str>,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl ApiError {
    pub fn new(
        source: impl std::error::Error + Send + Sync + 'static,
        status_code: http::StatusCode,
    ) -> Self {
        Self {
            status_code,
            kind: None,
            source: source.into(),
        }
    }

    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn bad_request(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(source, http::StatusCode::BAD_REQUEST)
    }

    pub fn new_bad_request_with_reason(reason: &str) -> Self {
        Self {
            status_code: http::StatusCode::BAD_REQUEST,
            kind: None,
            source: reason.into(),
        }
    }

    pub fn new_unauthorized_from(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(source, http::StatusCode::UNAUTHORIZED)
    }

    pub fn new_unauthorized_with_reason(reason: &str) -> Self {
        Self {
            status_code: http::StatusCode::UNAUTHORIZED,
            kind: None,
            source: reason.into(),
        }
    }
}

impl From<InternalError> for ApiError {
    fn from(e: InternalError) -> Self {
        e.api_err()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if self.status_code == http::StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(
                error = ?self.source,
                error_msg = %self.source,
                status_code = %self.status_code,
                "Internal API error",
            );
            (self.status_code, "").into_response()
        } else {
            tracing::warn!(
                error_msg = %self.source,
                error_kind = self.kind,
                status_code = %self.status_code,
                "API error",
            );

            let response_body = axum::response::Json(ApiErrorResponse {
                message: self.source.to_string(),
                kind: self.kind.map(ToString::to_string),
            });

            (self.status_code, response_body).into_response()
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Provides explicit conversion into [`ApiError`].
///
/// See also [`ApiErrorCategorizable`].
pub trait IntoApiError {
    fn api_err(self) -> ApiError;
}

/// Allows using `.api_err()` method on [Result] types.
pub trait ResultIntoApiError<K, E>
where
    E: IntoApiError,
{
    fn api_err(self) -> Result<K, ApiError>;
}

impl<K, E> ResultIntoApiError<K, E> for Result<K, E>
where
    E: IntoApiError,
{
    fn api_err(self) -> Result<K, ApiError> {
        self.map_err(IntoApiError::api_err)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub enum ApiErrorCategory {
    BadRequest { kind: &'static str },
    Unauthorized { kind: &'static str },
    Internal,
}

impl ApiErrorCategory {
    fn from_wallet_auth(category: WalletAuthErrorCategory, kind: &'static str) -> Self {
        match category {
            WalletAuthErrorCategory::Validation => Self::BadRequest { kind },
            WalletAuthErrorCategory::Protocol | WalletAuthErrorCategory::Token => {
                Self::Unauthorized { kind }
            }
            WalletAuthErrorCategory::Internal => Self::Internal,
        }
    }
}

/// Categorizes an error into one of the response classes. Internal failures
/// never expose their details to clients.
pub trait ApiErrorCategorizable {
    fn categorize(&self) -> ApiErrorCategory;
}

impl<E> IntoApiError for E
where
    E: ApiErrorCategorizable,
    E: std::error::Error + Send + Sync + 'static,
{
    fn api_err(self) -> ApiError {
        match self.categorize() {
            ApiErrorCategory::BadRequest { kind } => ApiError::bad_request(self).with_kind(kind),
            ApiErrorCategory::Unauthorized { kind } => {
                ApiError::new_unauthorized_from(self).with_kind(kind)
            }
            ApiErrorCategory::Internal => {
                ApiError::new(self, http::StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl ApiErrorCategorizable for InternalError {
    fn categorize(&self) -> ApiErrorCategory {
        ApiErrorCategory::Internal
    }
}

impl ApiErrorCategorizable for RequestChallengeError {
    fn categorize(&self) -> ApiErrorCategory {
        ApiErrorCategory::from_wallet_auth(self.category(), self.kind())
    }
}

impl ApiErrorCategorizable for SubmitProofError {
    fn categorize(&self) -> ApiErrorCategory {
        ApiErrorCategory::from_wallet_auth(self.category(), self.kind())
    }
}

impl ApiErrorCategorizable for ValidateSessionError {
    fn categorize(&self) -> ApiErrorCategory {
        ApiErrorCategory::from_wallet_auth(self.category(), self.kind())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
