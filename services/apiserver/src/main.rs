//! Reviewhub API server entry point.
//!
//! # Purpose
//! Wires configuration, the identity verifier, the request gate, and storage,
//! then serves the HTTP API next to the Prometheus metrics listener.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup logic.
use anyhow::Context;
use apiserver::app::{AppState, build_router};
use apiserver::auth::introspection::IntrospectionVerifier;
use apiserver::config::{self, ApiConfig, AuthMode};
use apiserver::observability;
use apiserver::store::memory::InMemoryStore;
use apiserver::validation::builtin_schemas;
use reviewhub_gate::{Authenticator, IdentityVerifier, JwtVerifier, Lexicon, RequestGate};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env_or_yaml().context("api server config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: ApiConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("reviewhub-apiserver");
    let state = build_state(config.clone())?;
    tracing::info!(
        backend = state.store.backend_name(),
        auth_mode = ?config.auth.mode,
        banned_words = state.lexicon.len(),
        "api server state ready"
    );
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);
    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "api server listening");
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

fn build_verifier(auth: &config::AuthConfig) -> anyhow::Result<Arc<dyn IdentityVerifier>> {
    match auth.mode {
        AuthMode::Jwt => {
            let secret = auth.jwt_secret.as_deref().context("jwt secret missing")?;
            let mut verifier = JwtVerifier::new(secret.as_bytes());
            if let Some(issuer) = &auth.jwt_issuer {
                verifier = verifier.with_issuer(issuer.clone());
            }
            if let Some(audience) = &auth.jwt_audience {
                verifier = verifier.with_audience(audience.clone());
            }
            Ok(Arc::new(verifier.with_leeway(auth.jwt_leeway_secs)))
        }
        AuthMode::Introspection => {
            let url = auth
                .introspection_url
                .as_deref()
                .context("introspection url missing")?;
            let verifier = IntrospectionVerifier::new(url, auth.introspection_timeout)
                .context("build introspection client")?;
            Ok(Arc::new(verifier))
        }
    }
}

fn build_state(config: ApiConfig) -> anyhow::Result<AppState> {
    let authenticator = Authenticator::new(build_verifier(&config.auth)?);
    let lexicon = Arc::new(Lexicon::with_default_words());
    lexicon.add_all(&config.banned_words);
    Ok(AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: Instant::now(),
        store: Arc::new(InMemoryStore::new()),
        gate: Arc::new(RequestGate::new(authenticator, lexicon.clone())),
        lexicon,
        schemas: Arc::new(builtin_schemas()),
        cors_origins: config.cors_origins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;

    fn config(mode: AuthMode) -> ApiConfig {
        ApiConfig {
            bind_addr: "127.0.0.1:0".parse().expect("bind"),
            metrics_bind: "127.0.0.1:0".parse().expect("metrics"),
            auth: config::AuthConfig {
                mode,
                jwt_secret: Some("main-test-secret".to_string()),
                jwt_issuer: None,
                jwt_audience: None,
                jwt_leeway_secs: 0,
                introspection_url: None,
                introspection_timeout: Duration::from_millis(
                    config::DEFAULT_INTROSPECTION_TIMEOUT_MS,
                ),
            },
            banned_words: vec!["frell".to_string()],
            cors_origins: Vec::new(),
        }
    }

    #[test]
    fn build_state_merges_configured_words() {
        let state = build_state(config(AuthMode::Jwt)).expect("state");
        assert!(state.lexicon.contains_banned("what the frell"));
        assert!(state.lexicon.len() > 1);
        assert_eq!(state.schemas.len(), 6);
        assert!(!state.store.is_durable());
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn jwt_mode_requires_secret() {
        let mut config = config(AuthMode::Jwt);
        config.auth.jwt_secret = None;
        let err = build_state(config).err().expect("missing secret");
        assert!(err.to_string().contains("jwt secret missing"));
    }

    #[test]
    fn introspection_mode_requires_url() {
        let err = build_state(config(AuthMode::Introspection))
            .err()
            .expect("missing url");
        assert!(err.to_string().contains("introspection url missing"));
    }

    #[test]
    fn introspection_mode_builds_with_url() {
        let mut config = config(AuthMode::Introspection);
        config.auth.introspection_url = Some("http://127.0.0.1:1/introspect".to_string());
        build_state(config).expect("state");
    }

    #[tokio::test]
    #[serial]
    async fn run_with_shutdown_starts_and_stops() {
        run_with_shutdown(config(AuthMode::Jwt), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
        })
        .await
        .expect("run should stop cleanly");
    }
}
