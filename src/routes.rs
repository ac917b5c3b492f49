use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;

use crate::handlers;
use crate::models::AppState;

// Embed the default stylesheet in the binary
const DEFAULT_STYLESHEET: &str = include_str!("../static/styles.css");

pub fn build_router(state: AppState) -> Router {
    let stylesheet = state
        .custom_css
        .clone()
        .unwrap_or_else(|| DEFAULT_STYLESHEET.to_string());

    Router::new()
        .route("/", get(handlers::dashboard::dashboard_get))
        .route("/api/kiwivm", post(handlers::proxy::kiwivm_proxy))
        .route("/accounts", post(handlers::dashboard::account_create))
        .route("/accounts/:id/delete", post(handlers::dashboard::account_delete))
        .route("/accounts/:id/select", post(handlers::dashboard::account_select))
        .route("/accounts/:id/refresh", post(handlers::dashboard::account_refresh))
        .route("/accounts/:id/action/:action", post(handlers::dashboard::account_action))
        .route("/settings/refresh", post(handlers::dashboard::settings_refresh))
        .route("/settings/lookback", post(handlers::dashboard::settings_lookback))
        .route(
            "/static/styles.css",
            get(move || {
                let css = stylesheet.clone();
                async move { ([(axum::http::header::CONTENT_TYPE, "text/css")], css) }
            }),
        )
        // Serve static files with cache-control header
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=31536000, immutable"),
                ))
                .service(ServeDir::new("static")),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
