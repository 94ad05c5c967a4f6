use axum::{routing::get, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod backend;
mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod validation;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up BACKEND_URL, BACKEND_ANON_KEY, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting VivaMedellin API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("PORT").ok().and_then(|s| s.parse::<u16>().ok()).unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("VivaMedellin API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/health", get(health))
        // Public auth flows (redirect-based)
        .merge(auth_routes())
        // JSON API
        .merge(api_routes())
        // Page view models behind the route guard
        .merge(page_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::auth;

    Router::new()
        .route("/auth/signup", post(auth::signup_post))
        .route("/auth/login", post(auth::login_post))
        .route("/auth/confirm", get(auth::confirm_get))
}

fn api_routes() -> Router {
    use axum::routing::post;
    use handlers::{auth, events, profile, users};

    Router::new()
        // Availability checks and account recovery
        .route("/api/auth/check-email", get(auth::check_email_get))
        .route("/api/auth/check-username", get(auth::check_username_get))
        .route("/api/auth/resend", post(auth::resend_post))
        .route("/api/auth/forgot-password", post(auth::forgot_password_post))
        .route("/api/auth/reset-password", post(auth::reset_password_post))
        // Own profile
        .route("/api/profile", get(profile::profile_get))
        .route("/api/profile/save", post(profile::profile_save_post))
        .route("/api/profile/avatar", post(profile::avatar_post))
        // Other users
        .route("/api/users/search", get(users::search_get))
        .route("/api/users/:id", get(users::user_get))
        .route("/api/users/:id/following", get(users::following_get))
        .route("/api/users/:id/follow", post(users::follow_post).delete(users::follow_delete))
        // Favorite events
        .route("/api/events/:id/favorite", post(events::favorite_post))
        .route("/api/favorites", get(events::favorites_get))
}

fn page_routes() -> Router {
    use handlers::pages;

    Router::new()
        .route("/", get(pages::home_page))
        // Public pages
        .route("/login", get(pages::login_page))
        .route("/register", get(pages::register_page))
        .route("/forgot-password", get(pages::forgot_password_page))
        .route("/reset-password", get(pages::reset_password_page))
        .route("/error", get(pages::error_page))
        // Guarded pages
        .route("/dashboard", get(pages::dashboard_page))
        .route("/account", get(pages::account_page))
        .route("/account/complete", get(pages::complete_profile_page))
        .route("/account/edit", get(pages::edit_profile_page))
        .route("/users/:id", get(pages::user_profile_page))
        .layer(axum::middleware::from_fn(middleware::guard::guard_middleware))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::backend::Backend::shared().health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "backend": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "backend unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "backend_error": e.to_string()
                }
            })),
        ),
    }
}
