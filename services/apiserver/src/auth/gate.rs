//! Gate middleware.
//!
//! # Purpose
//! Runs every gated route through the request gate before its handler:
//! authenticate, authorize (resolving the resource owner on demand), then for
//! writes buffer the JSON body and run the profanity and schema stages.
//!
//! # Key invariants
//! - A denial returns immediately; the handler never runs.
//! - The body is only read after the caller has been admitted, and must be a
//!   JSON object of at most `MAX_BODY_BYTES`.
//! - Admitted requests carry the caller's `Identity` as a request extension
//!   and, for writes, the validated (and coerced) JSON body.
use crate::api::error::{ApiError, api_internal_message, api_invalid_json, api_payload_too_large};
use crate::app::AppState;
use crate::model::Entity;
use crate::store::StoreError;
use axum::body::Body;
use axum::extract::{Path, Query, Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use reviewhub_gate::{Candidate, GateError, RoutePolicy, bearer_token};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Per-route middleware state.
#[derive(Clone)]
pub struct GateLayerState {
    pub app: AppState,
    pub entity: Entity,
    pub route: Arc<RoutePolicy>,
}

pub async fn enforce(
    State(layer): State<GateLayerState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let params = path_params(&mut parts).await;
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = bearer_token(header);

    let owner_lookup = owner_lookup(&layer, &params);
    let identity = match layer
        .app
        .gate
        .admit(&layer.route, token, move || async move {
            let (app, collection, id) = owner_lookup?;
            resolve_owner(&app, collection, &id).await
        })
        .await
    {
        Ok(identity) => identity,
        Err(err) => return deny(&layer.route, err),
    };

    let body = if layer.route.inspects_body() {
        let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(err) if exceeds_limit(&err) => {
                tracing::info!(
                    route = %layer.route.label(),
                    limit = MAX_BODY_BYTES,
                    "request body too large"
                );
                return api_payload_too_large().into_response();
            }
            Err(err) => {
                tracing::info!(route = %layer.route.label(), error = %err, "request body unreadable");
                return api_invalid_json().into_response();
            }
        };
        let json = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Default::default())
        } else {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(json @ Value::Object(_)) => json,
                Ok(_) => {
                    tracing::info!(route = %layer.route.label(), "request body is not a JSON object");
                    return api_invalid_json().into_response();
                }
                Err(err) => {
                    tracing::info!(route = %layer.route.label(), error = %err, "request body is not JSON");
                    return api_invalid_json().into_response();
                }
            }
        };
        let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default();
        let mut candidate = Candidate::new(json).with_params(params).with_query(query);
        if let Err(err) = layer.app.gate.inspect(&layer.route, &mut candidate) {
            return deny(&layer.route, err);
        }
        let bytes = match serde_json::to_vec(&candidate.body) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(error = %err, "failed to re-encode validated body");
                return api_internal_message("Internal server error").into_response();
            }
        };
        parts.headers.remove(CONTENT_LENGTH);
        parts
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Body::from(bytes)
    } else {
        body
    };

    parts.extensions.insert(identity);
    next.run(Request::from_parts(parts, body)).await
}

fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(current) = source {
        if current.is::<LengthLimitError>() {
            return true;
        }
        source = current.source();
    }
    false
}

async fn path_params(parts: &mut Parts) -> HashMap<String, String> {
    use axum::extract::FromRequestParts;
    match Path::<HashMap<String, String>>::from_request_parts(parts, &()).await {
        Ok(Path(params)) => params,
        Err(_) => HashMap::new(),
    }
}

fn owner_lookup(
    layer: &GateLayerState,
    params: &HashMap<String, String>,
) -> Option<(AppState, &'static str, String)> {
    if !layer.entity.is_owned() {
        return None;
    }
    let id = params.get("id")?;
    Some((layer.app.clone(), layer.entity.as_str(), id.clone()))
}

/// The stored document's `authorId`, or `None` when there is no document.
async fn resolve_owner(app: &AppState, collection: &str, id: &str) -> Option<String> {
    match app.store.get(collection, id).await {
        Ok(document) => document.string_field("authorId").map(str::to_string),
        Err(StoreError::NotFound(_)) => None,
        Err(err) => {
            tracing::warn!(collection, id, error = ?err, "owner lookup failed");
            None
        }
    }
}

fn deny(route: &RoutePolicy, err: GateError) -> Response {
    let reason = err.kind();
    metrics::counter!("reviewhub_gate_denials_total", "reason" => reason).increment(1);
    if err.is_client_error() {
        tracing::info!(route = %route.label(), reason, detail = %err, "request denied");
    } else {
        tracing::warn!(route = %route.label(), reason, "request gate unavailable");
    }
    ApiError::from(err).into_response()
}
