#![allow(dead_code)]

use apiserver::app::{AppState, build_router};
use apiserver::store::memory::InMemoryStore;
use apiserver::validation::builtin_schemas;
use reviewhub_gate::{Authenticator, IdentityVerifier, JwtVerifier, Lexicon, RequestGate, Role};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

pub type TestApp = axum::routing::RouterIntoService<axum::body::Body, ()>;

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn state_with_verifier(verifier: Arc<dyn IdentityVerifier>) -> AppState {
    let lexicon = Arc::new(Lexicon::with_default_words());
    AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: Instant::now(),
        store: Arc::new(InMemoryStore::new()),
        gate: Arc::new(RequestGate::new(
            Authenticator::new(verifier),
            lexicon.clone(),
        )),
        lexicon,
        schemas: Arc::new(builtin_schemas()),
        cors_origins: Vec::new(),
    }
}

pub fn jwt_app() -> TestApp {
    build_router(state_with_verifier(Arc::new(JwtVerifier::new(TEST_SECRET)))).into_service()
}

pub fn token(subject: &str, role: Role) -> String {
    JwtVerifier::new(TEST_SECRET)
        .mint(subject, role, Duration::from_secs(300))
        .expect("mint")
}

pub fn admin_token() -> String {
    token("admin-1", Role::Admin)
}

pub fn user_token(subject: &str) -> String {
    token(subject, Role::User)
}
