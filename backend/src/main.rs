use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};

use pocketbook_backend::domain::theme_service::NoSystemTheme;
use pocketbook_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let app_state = initialize_backend().await?;

    // Headless servers have no appearance API; the theme falls back to
    // light until a client toggles it.
    app_state
        .theme_service
        .init(Arc::new(NoSystemTheme::new()))
        .await;

    let theme_service = app_state.theme_service.clone();
    let app = create_router(app_state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            info!("Shutting down");
            theme_service.shutdown().await;
        })
        .await?;

    Ok(())
}
