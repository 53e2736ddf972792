//! HTTP application wiring for the API server.
//!
//! # Purpose
//! Builds the Axum router, attaches the per-route request gate, and defines the
//! shared application state injected into handlers and middleware.
//!
//! # Notes
//! Every entity route is wrapped with its own `route_layer`, so the gate only
//! runs for matched routes and an unknown path still yields a plain 404.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::auth::gate::{GateLayerState, enforce};
use crate::auth::policies::route_policy;
use crate::model::Entity;
use crate::observability;
use crate::store::DocumentStore;
use axum::Router;
use axum::http::{HeaderName, HeaderValue, header};
use axum::middleware;
use axum::routing::{MethodRouter, get, post};
use reviewhub_gate::{Lexicon, Operation, RequestGate, SchemaRegistry};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    /// Release version reported by the health check.
    pub version: String,
    pub started_at: Instant,
    pub store: Arc<dyn DocumentStore + Send + Sync>,
    pub gate: Arc<RequestGate>,
    pub lexicon: Arc<Lexicon>,
    pub schemas: Arc<SchemaRegistry>,
    /// Allowed CORS origins; empty means any origin.
    pub cors_origins: Vec<String>,
}

fn gated(
    state: &AppState,
    entity: Entity,
    operation: Operation,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    let layer = GateLayerState {
        app: state.clone(),
        entity,
        route: route_policy(entity, operation, &state.schemas),
    };
    route.route_layer(middleware::from_fn_with_state(layer, enforce))
}

fn entity_routes(
    state: &AppState,
    entity: Entity,
    collection: MethodRouter<AppState>,
    create: MethodRouter<AppState>,
    item: [MethodRouter<AppState>; 3],
) -> Router<AppState> {
    let [fetch, update, delete] = item;
    let base = format!("/api/v1/{}", entity.as_str());
    Router::new()
        .route(
            &base,
            gated(state, entity, Operation::List, collection).merge(gated(
                state,
                entity,
                Operation::Create,
                create,
            )),
        )
        .route(
            &format!("{base}/:id"),
            gated(state, entity, Operation::Get, fetch)
                .merge(gated(state, entity, Operation::Update, update))
                .merge(gated(state, entity, Operation::Delete, delete)),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return base.allow_origin(Any);
    }
    let allowed = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();
    base.allow_origin(AllowOrigin::list(allowed))
}

fn security_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value))
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    let reviews = entity_routes(
        &state,
        Entity::Reviews,
        get(api::reviews::list_reviews),
        post(api::reviews::create_review),
        [
            get(api::reviews::get_review),
            axum::routing::put(api::reviews::update_review),
            axum::routing::delete(api::reviews::delete_review),
        ],
    );
    let comments = entity_routes(
        &state,
        Entity::Comments,
        get(api::comments::list_comments),
        post(api::comments::create_comment),
        [
            get(api::comments::get_comment),
            axum::routing::put(api::comments::update_comment),
            axum::routing::delete(api::comments::delete_comment),
        ],
    );
    let categories = entity_routes(
        &state,
        Entity::Categories,
        get(api::categories::list_categories),
        post(api::categories::create_category),
        [
            get(api::categories::get_category),
            axum::routing::put(api::categories::update_category),
            axum::routing::delete(api::categories::delete_category),
        ],
    );
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/", get(api::system::root))
        .route("/api/v1/health", get(api::system::health))
        .route(
            "/api/v1/admin/lexicon",
            gated(
                &state,
                Entity::Lexicon,
                Operation::Create,
                post(api::lexicon::add_words),
            ),
        )
        .merge(reviews)
        .merge(comments)
        .merge(categories)
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs")
                .url("/api/v1/openapi.json", ApiDoc::openapi()),
        )
        .layer(security_header(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .layer(security_header(header::X_FRAME_OPTIONS, "DENY"))
        .layer(security_header(header::REFERRER_POLICY, "no-referrer"))
        .layer(cors)
        .layer(trace_layer)
        .with_state(state)
}
