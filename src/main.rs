use axum::{middleware as axum_middleware, routing::get, routing::post, routing::put, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use basevault_api::database::manager::DatabaseManager;
use basevault_api::handlers::{admin, public};
use basevault_api::middleware::admin_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = basevault_api::config::config();
    tracing::info!("Starting BaseVault API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("BASEVAULT_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("BaseVault API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(catalog_routes())
        .merge(gatekeeper_routes())
        .merge(admin_routes())
        // Global middleware. The permissive CORS layer also answers the
        // OPTIONS preflight with an empty body; preflights never reach the
        // gatekeeper and write no audit row.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn catalog_routes() -> Router {
    Router::new()
        .route("/bases", get(public::catalog::list_bases))
        .route("/bases/:id", get(public::catalog::get_base))
        .route("/bases/:id/ratings", post(public::ratings::submit_rating))
        .route("/bases/:id/downloads", post(public::downloads::track_download))
}

fn gatekeeper_routes() -> Router {
    Router::new().route("/auth/admin/login", post(public::auth::admin_login))
}

fn admin_routes() -> Router {
    Router::new()
        .route(
            "/api/admin/bases",
            get(admin::bases::list_bases),
        )
        .route(
            "/api/admin/bases/:id",
            put(admin::bases::update_base).delete(admin::bases::delete_base),
        )
        .route("/api/admin/bases/import", post(admin::import::import_csv))
        .route(
            "/api/admin/security/attempts",
            get(admin::security::list_attempts),
        )
        .route(
            "/api/admin/security/allowed-ips",
            put(admin::security::put_allowed_ips),
        )
        .route(
            "/api/admin/security/cleanup",
            post(admin::security::cleanup_attempts),
        )
        .route("/api/admin/analytics", get(admin::analytics::totals))
        // Session check + per-request admin re-validation
        .route_layer(axum_middleware::from_fn(admin_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "BaseVault API",
            "version": version,
            "description": "Catalog API for game base layouts",
            "endpoints": {
                "home": "/ (public)",
                "catalog": "/bases, /bases/:id, /bases/:id/ratings, /bases/:id/downloads (public)",
                "gatekeeper": "/auth/admin/login (public - admin session acquisition)",
                "admin": "/api/admin/* (protected - moderation, import, security, analytics)"
            }
        }
    }))
}

async fn health() -> (axum::http::StatusCode, axum::response::Json<Value>) {
    match DatabaseManager::health_check().await {
        Ok(()) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({ "status": "ok" })),
        ),
        Err(err) => {
            tracing::warn!("Health check failed: {}", err);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({ "status": "degraded", "database": "unreachable" })),
            )
        }
    }
}
