use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use scholar_api::auth::{AppState, AppStateInner};
use scholar_db::{Database, DemoStore, UserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scholar=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("SCHOLAR_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("SCHOLAR_DB_PATH").unwrap_or_else(|_| "scholar.db".into());
    let host = std::env::var("SCHOLAR_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("SCHOLAR_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let demo_mode = std::env::var("SCHOLAR_DEMO_MODE")
        .map(|v| v == "true")
        .unwrap_or(false);

    // The store is chosen once here; nothing downstream knows which
    // backend it is talking to.
    let store: Arc<dyn UserStore> = if demo_mode {
        info!("Demo mode: serving the seeded in-memory user store");
        Arc::new(DemoStore::seeded())
    } else {
        Arc::new(Database::open(&PathBuf::from(&db_path))?)
    };

    let state: AppState = Arc::new(AppStateInner { store, jwt_secret });

    let app = scholar_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Scholar server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
