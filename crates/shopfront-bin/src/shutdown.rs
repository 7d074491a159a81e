// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Stopping the server cleanly.
//!
//! SIGTERM, SIGINT/Ctrl+C and [`ShutdownCoordinator::initiate_shutdown`] all
//! flip the same latch. The latch never resets, so a waiter that subscribes
//! after the trigger still returns immediately.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

/// Shared shutdown latch. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    latch: Arc<watch::Sender<bool>>,
}

impl ShutdownCoordinator {
    /// An untripped latch.
    pub fn new() -> Self {
        let (latch, _) = watch::channel(false);
        Self {
            latch: Arc::new(latch),
        }
    }

    /// A `'static` future for `axum::serve(..).with_graceful_shutdown`.
    pub fn shutdown_signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut receiver = self.latch.subscribe();
        async move {
            // Err means every sender is gone, which can only follow a trigger.
            let _ = receiver.wait_for(|stopped| *stopped).await;
        }
    }

    /// Waits for the latch.
    pub async fn wait(&self) {
        self.shutdown_signal().await
    }

    /// Trips the latch. Repeated calls are no-ops.
    pub fn initiate_shutdown(&self) {
        let first = self.latch.send_if_modified(|stopped| {
            let was_stopped = *stopped;
            *stopped = true;
            !was_stopped
        });
        if first {
            info!("Shutdown initiated");
        }
    }

    /// Whether the latch has tripped.
    pub fn is_shutdown_initiated(&self) -> bool {
        *self.latch.borrow()
    }

    /// Trips the latch on the first OS termination signal. The task also
    /// exits if shutdown is triggered some other way.
    pub fn listen_for_signals(&self) -> tokio::task::JoinHandle<()> {
        let coordinator = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = termination() => coordinator.initiate_shutdown(),
                _ = coordinator.wait() => {}
            }
        })
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// First of Ctrl+C and, on Unix, SIGTERM. A handler that fails to install
/// is logged and never fires.
async fn termination() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Interrupted");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Terminated");
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
}
