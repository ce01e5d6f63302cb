use std::str::FromStr;

use axum::{Router, routing::get};
use quizforge::{AppState, auth, dashboard, db, generator, quizzes};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::cors::CorsLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizforge=info")),
        )
        .init();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(30)));

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(dotenv::var("DATABASE_URL").unwrap().as_str())
        .await.unwrap();
    db::init(&db_pool).await.unwrap();

    let base_url = dotenv::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned());
    let clients = auth::Clients::from_json(
        serde_json::Value::from_str(include_str!("../client_secret.json")).unwrap(),
        &base_url,
    ).unwrap();

    let app_state = AppState { db_pool, clients };

    let app = Router::new()
        .route("/", get(dashboard::index))

        .merge(auth::router())
        .nest("/g", generator::router())
        .nest("/q", quizzes::router())

        .with_state(app_state)
        .layer(session_layer)
        .layer(CorsLayer::permissive());

    let addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
    tracing::info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
