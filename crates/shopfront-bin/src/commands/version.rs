// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::error::BinResult;

/// Prints component versions and build information.
pub fn version() -> BinResult<()> {
    println!("Shopfront - e-commerce REST backend");
    println!();
    println!("Version Information:");
    println!("  shopfront-bin:    {}", crate::VERSION);
    println!("  shopfront-api:    {}", shopfront_api::VERSION);
    println!("  shopfront-store:  {}", shopfront_store::VERSION);
    println!("  shopfront-config: {}", shopfront_config::VERSION);
    println!();
    println!("Build Information:");
    println!("  Target:  {}", std::env::consts::ARCH);
    println!("  OS:      {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
