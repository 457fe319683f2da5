//! Router assembly and HTTP middleware
//!
//! `build_app` is what the binary serves and what the integration tests
//! drive: the routed API wrapped in path normalization.

use crate::api;
use crate::config::CorsConfig;
use crate::state::AppState;
use axum::{
    extract::Request,
    http::{header, uri::PathAndQuery, HeaderName, HeaderValue, Method, Uri},
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower::util::{MapRequest, MapRequestLayer};
use tower::Layer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Response header carrying the request ID
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// The served application: router behind path normalization
pub type AppService = MapRequest<Router, fn(Request) -> Request>;

/// Build the API router with its middleware stack
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/", get(api::health::index))
        .route("/api/health", get(api::health::health_check))
        // Dashboard query API
        .route("/sub-field-detail", get(api::sub_fields::sub_field_detail))
        .route("/topic-detail", get(api::topics::topic_detail))
        .route("/concepts", get(api::concepts::concepts))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(cors)
        .with_state(state)
}

/// Build the router and normalize request paths before routing
pub fn build_app(state: Arc<AppState>) -> AppService {
    // Runs outside the router so the rewritten path is the one matched.
    MapRequestLayer::new(collapse_slashes as fn(Request) -> Request).layer(build_router(state))
}

/// CORS policy for the dashboard origins
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allows_any() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                }),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE])
}

/// Request ID middleware - adds unique ID to each request for tracing
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let mut response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Collapse runs of `/` in the request path
///
/// The dashboard joins a base URL ending in `/` with endpoints starting
/// with `/`, so `//concepts` has to route like `/concepts`.
pub fn collapse_slashes(mut request: Request) -> Request {
    let Some(path) = collapsed_path(request.uri().path()) else {
        return request;
    };

    let path_and_query = match request.uri().query() {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    };

    let mut parts = request.uri().clone().into_parts();
    match PathAndQuery::try_from(path_and_query) {
        Ok(pq) => {
            parts.path_and_query = Some(pq);
            if let Ok(uri) = Uri::from_parts(parts) {
                *request.uri_mut() = uri;
            }
        }
        Err(e) => tracing::debug!(error = %e, "Leaving request path as received"),
    }

    request
}

/// Path with repeated slashes merged, or `None` if there were none
fn collapsed_path(path: &str) -> Option<String> {
    if !path.contains("//") {
        return None;
    }

    let mut collapsed = String::with_capacity(path.len());
    let mut previous_slash = false;
    for ch in path.chars() {
        let is_slash = ch == '/';
        if !(is_slash && previous_slash) {
            collapsed.push(ch);
        }
        previous_slash = is_slash;
    }
    Some(collapsed)
}
