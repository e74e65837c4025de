use std::collections::HashMap;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use fixwatch_server::{api::app_router, build_state, config::Config};
use tempfile::tempdir;
use tower::ServiceExt;

fn lookup_config(vars: &[(&str, String)]) -> Result<Config, fixwatch_server::config::ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[tokio::test]
async fn healthz_and_readyz() {
    let dir = tempdir().unwrap();
    let config = lookup_config(&[
        ("BANXICO_TOKEN", "token".to_string()),
        (
            "FW_SECRETS_FILE",
            dir.path().join("secrets.json").display().to_string(),
        ),
    ])
    .unwrap();
    let app = app_router(build_state(&config).unwrap(), &config);

    for uri in ["/api/v1/healthz", "/api/v1/readyz"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let dir = tempdir().unwrap();
    let config = lookup_config(&[
        ("BANXICO_TOKEN", "token".to_string()),
        (
            "FW_SECRETS_FILE",
            dir.path().join("secrets.json").display().to_string(),
        ),
    ])
    .unwrap();
    let app = app_router(build_state(&config).unwrap(), &config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/accounts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn startup_refuses_without_token() {
    let dir = tempdir().unwrap();
    let err = lookup_config(&[(
        "FW_SECRETS_FILE",
        dir.path().join("secrets.json").display().to_string(),
    )])
    .err()
    .unwrap();
    assert!(err
        .to_string()
        .contains("Set it in the secrets file"));
}
