use anyhow::Context;
use cocktails::{AppState, Config, router};
use tokio::net::TcpListener;

pub fn run(config: Config) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?
        .block_on(serve(config))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    if config.api_key.is_none() {
        tracing::warn!("No API key configured, adding recipes is disabled");
    }

    let state = AppState::from_config(&config).with_context(|| {
        format!(
            "failed to open data directory {}",
            config.data_directory.display()
        )
    })?;

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!(
        "Serving recipes from {} on http://{}",
        config.data_directory.display(),
        config.bind
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                tracing::warn!("Failed to register SIGTERM handler: {e}");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
