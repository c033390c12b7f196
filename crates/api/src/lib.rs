//! HTTP API server for the ordering service.
//!
//! Exposes the catalog, cart, order and seller workflows as JSON endpoints,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod identity;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::{ContactService, LogNotifier, ShopService};
use metrics_exporter_prometheus::PrometheusHandle;
use store::ShopStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState<S: ShopStore> {
    pub shop: ShopService<S>,
    /// Absent when no inquiry mailbox is configured.
    pub contact: Option<ContactService>,
    pub login_url: String,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: ShopStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/items",
            get(routes::catalog::list::<S>).post(routes::catalog::create::<S>),
        )
        .route(
            "/items/{slug}",
            get(routes::catalog::detail::<S>)
                .put(routes::catalog::update::<S>)
                .delete(routes::catalog::delete::<S>),
        )
        .route(
            "/items/{slug}/reviews",
            post(routes::catalog::add_review::<S>),
        )
        .route("/items/{slug}/cart", post(routes::cart::add::<S>))
        .route("/cart", get(routes::cart::view::<S>))
        .route(
            "/cart/{line_id}",
            axum::routing::delete(routes::cart::remove::<S>),
        )
        .route(
            "/orders",
            get(routes::orders::history::<S>).post(routes::orders::place::<S>),
        )
        .route("/seller/items", get(routes::seller::items::<S>))
        .route("/seller/orders/pending", get(routes::seller::pending::<S>))
        .route(
            "/seller/orders/delivered",
            get(routes::seller::delivered::<S>),
        )
        .route(
            "/seller/orders/{line_id}/status",
            post(routes::seller::update_status::<S>),
        )
        .route("/seller/dashboard", get(routes::seller::dashboard::<S>))
        .route("/contact", post(routes::contact::submit::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over `store`, wiring the contact form to the
/// log mailer when a mailbox is configured.
pub fn create_state<S: ShopStore>(store: S, config: &Config) -> Arc<AppState<S>> {
    let contact = config
        .mailbox()
        .map(|mailbox| ContactService::new(Arc::new(LogNotifier), mailbox));

    Arc::new(AppState {
        shop: ShopService::new(store),
        contact,
        login_url: config.login_url.clone(),
    })
}
