// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::LazyLock;

use chrono::Duration;
use regex::Regex;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

static SESSION_TTL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([smhd])$").unwrap());

/// Longest accepted session lifetime. Any expiry computed from it stays well
/// inside the representable time range.
pub const MAX_SESSION_TTL_DAYS: i64 = 100 * 365;

/// Session token lifetime in compact notation (`30s`, `15m`, `12h`, `7d`).
///
/// The original expression is kept verbatim, it is reported back to clients
/// as `expiresIn`. An expression that does not parse, or exceeds
/// [`MAX_SESSION_TTL_DAYS`], yields no duration and tokens issued with it
/// never expire, use [`SessionTtl::parse_strict`] to reject such expressions
/// instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTtl {
    expr: String,
    duration: Option<Duration>,
}

impl SessionTtl {
    pub fn parse(expr: impl Into<String>) -> Self {
        let expr = expr.into();
        let duration = parse_duration(&expr);

        Self { expr, duration }
    }

    pub fn parse_strict(expr: impl Into<String>) -> Result<Self, InvalidSessionTtlError> {
        let ttl = Self::parse(expr);
        if ttl.duration.is_none() {
            return Err(InvalidSessionTtlError { expr: ttl.expr });
        }

        Ok(ttl)
    }

    pub fn as_str(&self) -> &str {
        &self.expr
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

impl std::fmt::Display for SessionTtl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.expr)
    }
}

fn parse_duration(expr: &str) -> Option<Duration> {
    let captures = SESSION_TTL_REGEX.captures(expr)?;

    let magnitude: i64 = captures[1].parse().ok()?;
    let unit_seconds: i64 = match &captures[2] {
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        _ => unreachable!(),
    };

    let duration = magnitude
        .checked_mul(unit_seconds)
        .and_then(Duration::try_seconds)?;

    (duration <= Duration::days(MAX_SESSION_TTL_DAYS)).then_some(duration)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, PartialEq, Eq)]
#[error(
    "Invalid session TTL expression: '{expr}', expected e.g. '30s', '15m', '12h' or '7d', up to \
     100 years"
)]
pub struct InvalidSessionTtlError {
    pub expr: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
