// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::future::Future;
use std::net::{IpAddr, SocketAddr};

use axum::extract::Extension;
use dill::Catalog;
use internal_error::{InternalError, ResultIntoInternal};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct APIServer {
    router: axum::Router,
    listener: tokio::net::TcpListener,
    local_addr: SocketAddr,
}

impl APIServer {
    pub async fn new(catalog: Catalog, address: IpAddr, port: u16) -> Result<Self, InternalError> {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from((address, port)))
            .await
            .int_err()?;
        let local_addr = listener.local_addr().int_err()?;

        Ok(Self {
            router: Self::build_router(catalog),
            listener,
            local_addr,
        })
    }

    pub fn build_router(catalog: Catalog) -> axum::Router {
        wallet_auth_adapter_http::root_router()
            .layer(
                tower::ServiceBuilder::new()
                    .layer(observability::axum::http_trace_layer())
                    .layer(
                        tower_http::cors::CorsLayer::new()
                            .allow_origin(tower_http::cors::Any)
                            .allow_methods(vec![
                                http::Method::GET,
                                http::Method::POST,
                                http::Method::OPTIONS,
                            ])
                            .allow_headers(tower_http::cors::Any),
                    )
                    .layer(Extension(catalog)),
            )
            .fallback(observability::axum::unknown_fallback_handler)
    }

    pub fn local_addr(&self) -> &SocketAddr {
        &self.local_addr
    }

    pub async fn run(
        self,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), InternalError> {
        axum::serve(self.listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal)
            .await
            .int_err()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
