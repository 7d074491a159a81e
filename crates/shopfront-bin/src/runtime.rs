// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server runtime orchestration.
//!
//! Startup order: open the store (migrating and seeding as configured),
//! build the token codec and application state, serve. Shutdown order: stop
//! accepting, drain in-flight requests within the grace period, close the
//! store.

use std::sync::Arc;

use tracing::{info, warn};

use shopfront_api::{ApiServer, AppState};
use shopfront_config::ShopfrontConfig;
use shopfront_store::Store;

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// ServerRuntime
// =============================================================================

/// Runs the API server until shutdown is signaled.
pub struct ServerRuntime {
    config: Arc<ShopfrontConfig>,
    shutdown: ShutdownCoordinator,
}

impl ServerRuntime {
    /// Creates a runtime with its own shutdown coordinator.
    pub fn new(config: ShopfrontConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Returns the coordinator that stops this runtime.
    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Opens the store described by the configuration.
    pub async fn open_store(&self) -> BinResult<Store> {
        Store::connect(&self.config.store_config())
            .await
            .map_err(|e| BinError::from(e).with_context("Failed to open database"))
    }

    /// Runs the server until shutdown is signaled.
    pub async fn run(self) -> BinResult<()> {
        info!("Starting Shopfront v{}", shopfront_api::VERSION);

        let store = self.open_store().await?;
        let api_config = self.config.api_config();
        let grace = api_config.shutdown_timeout;

        let state = AppState::builder()
            .config(api_config)
            .store(store.clone())
            .build()
            .map_err(|e| BinError::from(e).with_context("Failed to initialize API state"))?;
        let server = ApiServer::new(state);
        info!(addr = %server.addr(), "Shopfront is ready");

        let signals = self.shutdown.listen_for_signals();
        let mut serving =
            tokio::spawn(server.run_with_shutdown(self.shutdown.shutdown_signal()));

        let result = tokio::select! {
            joined = &mut serving => flatten(joined),
            _ = self.shutdown.wait() => {
                info!("Shutdown initiated, draining in-flight requests...");
                match tokio::time::timeout(grace, &mut serving).await {
                    Ok(joined) => flatten(joined),
                    Err(_) => {
                        warn!(
                            grace_secs = grace.as_secs(),
                            "Grace period elapsed, aborting open connections"
                        );
                        serving.abort();
                        Ok(())
                    }
                }
            }
        };

        signals.abort();
        store.close().await;
        info!("Shopfront shutdown complete");

        result
    }
}

fn flatten(
    joined: Result<shopfront_api::ApiResult<()>, tokio::task::JoinError>,
) -> BinResult<()> {
    match joined {
        Ok(result) => result.map_err(BinError::from),
        Err(e) => Err(BinError::runtime(format!("Server task failed: {}", e))),
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config: Option<ShopfrontConfig>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ShopfrontConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<ServerRuntime> {
        let config = self
            .config
            .ok_or_else(|| BinError::config("No configuration provided"))?;
        Ok(ServerRuntime::new(config))
    }
}

// =============================================================================
// Tests
// =============================================================================
