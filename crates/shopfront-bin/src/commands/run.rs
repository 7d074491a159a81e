// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `run` command.

use shopfront_config::ShopfrontConfig;

use crate::error::BinResult;
use crate::runtime::RuntimeBuilder;

/// Starts the API server and blocks until shutdown.
pub async fn run(config: ShopfrontConfig) -> BinResult<()> {
    RuntimeBuilder::new().config(config).build()?.run().await
}
