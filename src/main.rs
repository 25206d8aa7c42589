use std::env;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wage_engine::api::{AppState, create_router};

const DEFAULT_CONFIG_DIR: &str = "./config/payroll";
const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wage_engine=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir =
        env::var("WAGE_ENGINE_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind = env::var("WAGE_ENGINE_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());

    // Configuration is read on the first request
    let state = AppState::lazy(&config_dir);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, config_dir = %config_dir, "Wage engine listening");

    axum::serve(listener, router).await
}
