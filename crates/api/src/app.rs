use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use domain::services::{ImportPipeline, TemplateCatalog, TemplateStore};
use persistence::PgTemplateStore;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, security_headers_middleware, trace_id};
use crate::routes::{colors, health, imports, templates};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub store: Arc<dyn TemplateStore>,
    pub catalog: Arc<TemplateCatalog>,
    pub pipeline: Arc<ImportPipeline>,
}

/// Application backed by Postgres.
pub fn create_app(config: Config, pool: PgPool, catalog: TemplateCatalog) -> Router {
    let store = Arc::new(PgTemplateStore::new(pool.clone()));
    create_app_with_store(config, pool, store, catalog)
}

/// Application with an injected template store. The pool only serves the
/// health probes.
pub fn create_app_with_store(
    config: Config,
    pool: PgPool,
    store: Arc<dyn TemplateStore>,
    catalog: TemplateCatalog,
) -> Router {
    let config = Arc::new(config);
    let pipeline = ImportPipeline::new(config.import.heuristics.clone());

    let state = AppState {
        pool,
        config: config.clone(),
        store,
        catalog: Arc::new(catalog),
        pipeline: Arc::new(pipeline),
    };

    // Empty origin list allows any origin (development).
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let api_routes = Router::new()
        .nest("/api/v1/templates", templates::router())
        .nest("/api/v1/imports", imports::router())
        .route("/api/v1/colors/contrast", get(colors::contrast));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
