use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use watchpick::{
    api::{create_router, AppState},
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("watchpick=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let state = AppState::new(config.clone());

    // The main application may push shows later, so missing data is not fatal here
    match state.catalog().await {
        Ok(catalog) => tracing::info!(
            shows = catalog.shows.len(),
            tags = catalog.tags.len(),
            origin = ?catalog.origin,
            "Show data available"
        ),
        Err(e) => tracing::warn!(error = %e, path = %state.store.path().display(), "No show data yet"),
    }

    tracing::info!(
        provider = ?config.ai_provider,
        model = %config.ai_model,
        ai_enabled = state.selector.has_credential(),
        "Assisted picking configured"
    );

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
