use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod state;

use dashboard_backend::config;
use dashboard_backend::icons::IconService;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    let app_config = config::load_config().map_err(anyhow::Error::msg)?;
    tracing::info!("Server will listen on {}", app_config.get_bind_address());
    tracing::info!(
        "Icon index: {} (ttl {}s, max limit {})",
        app_config.icons.index_url,
        app_config.icons.index_ttl_secs,
        app_config.icons.search_max_limit
    );

    // Index is memory-only and built lazily on first search / 索引仅在内存中，首次访问时构建
    let icons = Arc::new(IconService::from_config(&app_config.icons)?);
    let state = Arc::new(AppState { icons });

    let app = api::routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
