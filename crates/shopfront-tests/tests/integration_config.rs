// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Integration tests for configuration-driven startup.
//!
//! A configuration document is loaded, its store opened and the router built
//! from it, the same path the server binary takes.
//!
//! # Test Categories
//!
//! - **Loading**: files, formats, validation failures
//! - **Wiring**: issuer, expiration and secret flow into tokens

use std::io::Write;

use shopfront_config::{ConfigFormat, ConfigLoader, ShopfrontConfig};
use shopfront_store::Store;
use shopfront_tests::prelude::*;

const CONFIG_YAML: &str = r#"
server:
  port: 8081
  cors:
    allowed_origins: [ "https://shop.example.com" ]
database:
  url: "sqlite::memory:"
  max_connections: 1
auth:
  secret: config-driven-secret-of-32-bytes-or-more
  issuer: shop-test
  expiration_secs: 600
logging:
  level: debug
"#;

fn loader() -> ConfigLoader {
    ConfigLoader::new().with_env_vars(false)
}

async fn app_from(config: &ShopfrontConfig) -> TestApp {
    let store = Store::connect(&config.store_config()).await.unwrap();
    TestApp::from_parts(config.api_config(), store)
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_config_load_yaml_file() {
    let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
    file.write_all(CONFIG_YAML.as_bytes()).unwrap();

    let config = loader().load(file.path()).unwrap();
    assert_eq!(config.auth.issuer, "shop-test");
    assert_eq!(config.auth.expiration_secs, 600);
    assert!(config.store_config().is_in_memory());
}

#[test]
fn test_config_formats_agree() {
    let yaml = loader().load_from_str(CONFIG_YAML, ConfigFormat::Yaml).unwrap();

    let toml = r#"
[database]
url = "sqlite::memory:"
max_connections = 1

[auth]
secret = "config-driven-secret-of-32-bytes-or-more"
issuer = "shop-test"
expiration_secs = 600
"#;
    let toml = loader().load_from_str(toml, ConfigFormat::Toml).unwrap();

    assert_eq!(yaml.auth.issuer, toml.auth.issuer);
    assert_eq!(yaml.database.url, toml.database.url);
}

#[test]
fn test_config_missing_secret_is_rejected() {
    let err = loader()
        .load_from_str("server:\n  port: 8080\n", ConfigFormat::Yaml)
        .unwrap_err();
    assert_eq!(err.field(), Some("auth.secret"));
}

#[test]
fn test_config_unknown_section_is_rejected() {
    let content = format!("{}\nmetrics:\n  enabled: true\n", CONFIG_YAML);
    assert!(loader().load_from_str(&content, ConfigFormat::Yaml).is_err());
}

// =============================================================================
// Wiring
// =============================================================================

#[tokio::test]
async fn test_config_drives_token_issuance() {
    let config = loader().load_from_str(CONFIG_YAML, ConfigFormat::Yaml).unwrap();
    let app = app_from(&config).await;

    app.post_json("/auth/register", None, register_payload("Ada", "ada@example.com"))
        .await
        .assert_status(StatusCode::CREATED);
    let body = app
        .post_json("/auth/login", None, login_payload("ada@example.com", TEST_PASSWORD))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(body["expires_in"], 600);

    let token = body["token"].as_str().unwrap();
    app.get("/auth/me", Some(token)).await.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_config_secrets_isolate_deployments() {
    let config = loader().load_from_str(CONFIG_YAML, ConfigFormat::Yaml).unwrap();
    let app = app_from(&config).await;
    let other = TestApp::spawn().await;

    let (user, _) = app.login_as(roles::ADMIN).await;
    let token = other.token_for(&user, Some(roles::ADMIN));

    app.get("/auth/me", Some(&token))
        .await
        .assert_error(StatusCode::FORBIDDEN, "TOKEN_INVALID", "Token invalid");
}

#[tokio::test]
async fn test_config_issuer_mismatch_is_rejected() {
    let config = loader().load_from_str(CONFIG_YAML, ConfigFormat::Yaml).unwrap();
    let app = app_from(&config).await;

    let mut renamed = config.clone();
    renamed.auth.issuer = "someone-else".to_string();
    let impostor = app_from(&renamed).await;

    let (user, _) = app.login_as(roles::ADMIN).await;
    let token = impostor.token_for(&user, Some(roles::ADMIN));

    app.get("/auth/me", Some(&token))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
