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
use http_common::ApiError;
use internal_error::ResultIntoInternal;
use serde::{Deserialize, Serialize};
use time_source::SystemTimeSource;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

pub async fn health_handler(
    Extension(catalog): Extension<Catalog>,
) -> Result<Json<HealthResponse>, ApiError> {
    let time_source = catalog.get_one::<dyn SystemTimeSource>().int_err()?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: time_source.now().timestamp_millis(),
    }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
