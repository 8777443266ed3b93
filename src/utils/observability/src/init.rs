// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_LOGGING_CONFIG: &str = "info,tower_http=info";
pub const VERBOSE_LOGGING_CONFIG: &str = "debug,tower_http=trace";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output for interactive use
    Pretty,
    /// One JSON object per line, for log collectors
    Json,
}

/// Keeps the background log writer alive. Dropping it flushes pending
/// records.
#[must_use]
#[derive(Default)]
pub struct Guard {
    _appender: Option<WorkerGuard>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Installs the global subscriber writing to STDERR.
///
/// `RUST_LOG` takes precedence over the `verbose` flag.
pub fn init(format: LogFormat, verbose: bool) -> Guard {
    // Logging may be already initialized when running under tests
    if tracing::dispatcher::has_been_set() {
        return Guard::default();
    }

    let env_filter = env_filter(verbose);
    let (writer, appender_guard) = tracing_appender::non_blocking(std::io::stderr());

    let res = match format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(writer)
            .pretty()
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .try_init(),
    };

    if let Err(e) = res {
        eprintln!("Failed to initialize logging: {e}");
        return Guard::default();
    }

    crate::panic_handler::set_hook_trace_panics(true);

    Guard {
        _appender: Some(appender_guard),
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOGGING_CONFIG
        } else {
            DEFAULT_LOGGING_CONFIG
        })
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
