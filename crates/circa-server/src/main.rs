use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use circa_api::auth::{self, AppState, AppStateInner};
use circa_api::middleware::require_auth;
use circa_api::{feed, friends, notifications, status, wall};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "circa=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("CIRCA_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("CIRCA_DB_PATH").unwrap_or_else(|_| "circa.db".into());
    let host = std::env::var("CIRCA_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CIRCA_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = circa_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let app_state: AppState = Arc::new(AppStateInner { db, jwt_secret });

    // Routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(app_state.clone());

    let protected_routes = Router::new()
        .route("/feed", get(feed::get_feed))
        .route("/friends", get(friends::list_friends))
        .route("/friends/requests", get(friends::pending_requests))
        .route("/friends/requests", post(friends::send_friend_request))
        .route("/friends/requests/{friendship_id}/accept", post(friends::accept_friend_request))
        .route("/friends/requests/{friendship_id}/decline", post(friends::decline_friend_request))
        .route("/friends/{friendship_id}", delete(friends::unfriend))
        .route("/status", post(status::create_status))
        .route("/users/{user_id}/status", get(status::latest_status))
        .route("/users/{user_id}/wall", get(wall::get_wall))
        .route("/users/{user_id}/wall", post(wall::create_wall_post))
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/{notification_id}/read", post(notifications::mark_read))
        .layer(middleware::from_fn(require_auth))
        .with_state(app_state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Circa server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
