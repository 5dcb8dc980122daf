use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use apexskill_backend::api::router;
use apexskill_backend::auth;
use apexskill_backend::config::AppConfig;
use apexskill_backend::db;
use apexskill_backend::sheets::{GoogleSheetsClient, SheetsClient};
use apexskill_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "apexskill_backend=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let pool = db::connect(&config.database_url).await?;
    db::schema::bootstrap(&pool).await?;

    let sheets: Arc<dyn SheetsClient> = Arc::new(GoogleSheetsClient::new(config.sheets.clone())?);
    let state = AppState::new(pool, sheets, &config.jwt_secret);

    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        auth::ensure_admin(&state.admins, username, password).await?;
    }

    // Provision the submission sheets before the listener binds; credential
    // problems abort startup instead of failing the first form post.
    state.relay.ensure_sheets().await?;

    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
