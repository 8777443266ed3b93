// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::{Catalog, CatalogBuilder};
use time_source::SystemTimeSourceDefault;
use wallet_auth_inmem::InMemoryWalletAuthChallengeRepository;

use crate::cli::{Cli, Command};
use crate::config::ServerConfig;
use crate::{APIServer, AppError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const BINARY_NAME: &str = "wallet-auth-server";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn run(args: Cli) -> Result<(), AppError> {
    let Command::Run(run_args) = args.command;

    let _guard = observability::init::init(run_args.log_format.into(), args.verbose > 0);

    let config = ServerConfig::load_from_env(run_args.dev)?;

    if config.uses_generated_secret {
        tracing::warn!(
            "JWT_SECRET is not set, using a generated secret. Issued tokens will not survive a \
             restart"
        );
    }

    let port = run_args.port.unwrap_or(config.port);

    tracing::info!(
        version = VERSION,
        domain = %config.wallet_auth.domain,
        session_ttl = %config.wallet_auth.session_ttl,
        "Starting {BINARY_NAME}"
    );

    let catalog = configure_catalog(config);

    let api_server = APIServer::new(catalog, run_args.address, port).await?;

    tracing::info!(addr = %api_server.local_addr(), "HTTP server listening");

    api_server.run(shutdown_signal()).await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn configure_catalog(config: ServerConfig) -> Catalog {
    let mut b = CatalogBuilder::new();

    wallet_auth_services::register_dependencies(&mut b);

    b.add::<InMemoryWalletAuthChallengeRepository>();
    b.add::<SystemTimeSourceDefault>();

    b.add_value(config.wallet_auth);
    b.add_value(config.session_token);

    b.build()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for the shutdown signal");
        // Keep serving until the process is killed
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received");
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
