mod common;

use apiserver::app::build_router;
use apiserver::auth::introspection::IntrospectionVerifier;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::{read_json, state_with_verifier};
use http_helpers::authed_json_request;
use reviewhub_gate::{IdentityVerifier, Role, VerifyError};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

async fn introspect(Json(body): Json<Value>) -> Response {
    match body["token"].as_str().unwrap_or_default() {
        "admin-token" => Json(json!({ "active": true, "sub": "admin-7", "role": "admin" }))
            .into_response(),
        "user-token" => {
            Json(json!({ "active": true, "sub": "user-7", "role": "user" })).into_response()
        }
        "inactive" => Json(json!({ "active": false })).into_response(),
        "no-role" => Json(json!({ "active": true, "sub": "user-8" })).into_response(),
        "odd-role" => {
            Json(json!({ "active": true, "sub": "user-8", "role": "owner" })).into_response()
        }
        "no-subject" => Json(json!({ "active": true, "role": "user" })).into_response(),
        "denied" => StatusCode::UNAUTHORIZED.into_response(),
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "garbage" => "definitely not json".into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(json!({ "active": true, "sub": "user-9", "role": "user" })).into_response()
        }
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn spawn_identity_service() -> SocketAddr {
    let app = axum::Router::new().route("/introspect", axum::routing::post(introspect));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });
    addr
}

fn verifier(addr: SocketAddr) -> IntrospectionVerifier {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .no_proxy()
        .build()
        .expect("client");
    IntrospectionVerifier::with_client(client, format!("http://{addr}/introspect"))
}

#[tokio::test]
async fn active_tokens_resolve_to_identities() {
    let addr = spawn_identity_service().await;
    let verifier = verifier(addr);

    let admin = verifier.verify("admin-token").await.expect("admin");
    assert_eq!(admin.id, "admin-7");
    assert_eq!(admin.role, Role::Admin);

    let user = verifier.verify("user-token").await.expect("user");
    assert_eq!(user.id, "user-7");
    assert_eq!(user.role, Role::User);
}

#[tokio::test]
async fn rejected_tokens_are_not_backend_failures() {
    let addr = spawn_identity_service().await;
    let verifier = verifier(addr);
    for token in ["inactive", "no-role", "odd-role", "no-subject", "denied"] {
        let err = verifier.verify(token).await.expect_err(token);
        assert!(matches!(err, VerifyError::Rejected(_)), "{token}: {err:?}");
    }
}

#[tokio::test]
async fn service_failures_are_backend_errors() {
    let addr = spawn_identity_service().await;
    let verifier = verifier(addr);
    for token in ["broken", "garbage", "slow", "unexpected"] {
        let err = verifier.verify(token).await.expect_err(token);
        assert!(matches!(err, VerifyError::Backend(_)), "{token}: {err:?}");
    }
}

#[tokio::test]
async fn unreachable_service_is_a_backend_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let err = verifier(addr).verify("admin-token").await.expect_err("refused");
    assert!(matches!(err, VerifyError::Backend(_)));
}

#[tokio::test]
async fn gate_maps_introspection_outcomes_to_http() {
    let addr = spawn_identity_service().await;
    let app = build_router(state_with_verifier(Arc::new(verifier(addr)))).into_service();
    let body = json!({ "name": "Outdoors" });

    let response = app
        .clone()
        .oneshot(authed_json_request("POST", "/api/v1/categories", "admin-token", body.clone()))
        .await
        .expect("admin");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(authed_json_request("POST", "/api/v1/categories", "user-token", body.clone()))
        .await
        .expect("user");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(authed_json_request("POST", "/api/v1/categories", "inactive", body.clone()))
        .await
        .expect("inactive");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(authed_json_request("POST", "/api/v1/categories", "broken", body))
        .await
        .expect("broken");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = read_json(response).await;
    assert_eq!(json["message"], "Authentication service unavailable");
}
