use std::sync::Arc;

use cinematch_api::{
    api::{create_router, AppState},
    config::Config,
    services::CsvCatalogSource,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinematch_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(catalog = %config.catalog_path.display(), "Starting cinematch-api");

    // An unusable catalog is fatal: nothing can be served without a fitted model
    let source = Arc::new(CsvCatalogSource::new(
        config.catalog_path.clone(),
        config.catalog_filter(),
    ));
    let state = AppState::load(source, config.defaults()).await?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
