use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use exchange_core::api::{app_router, AppState};
use exchange_core::channel::{BroadcastChannel, NotificationChannel};
use exchange_core::config::Config;
use exchange_core::db;
use exchange_core::ingestion::IngestionService;
use exchange_core::providers::CryptoCompareProvider;
use exchange_core::provisioning::ProvisioningClient;
use exchange_core::rates::{ObservationRepository, ObservationRepositoryTrait, RateService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::from_env();

    if let Some(db_dir) = Path::new(&config.db_path).parent() {
        if !db_dir.as_os_str().is_empty() {
            std::fs::create_dir_all(db_dir)?;
        }
    }

    let pool = db::create_pool(&config.db_path)?;
    db::run_migrations(&pool)?;

    let repository = Arc::new(ObservationRepository::new(pool));
    for quote in &config.quote_symbols {
        repository.register_quote_symbol(quote)?;
    }
    for base in &config.tracked_symbols {
        repository.register_pair(base)?;
    }

    let channel: Arc<dyn NotificationChannel> = Arc::new(BroadcastChannel::new(16));
    let source = Arc::new(CryptoCompareProvider::new(
        config.feed_url.clone(),
        config.fetch_timeout,
    )?);

    let ingestion = Arc::new(IngestionService::new(
        repository.clone(),
        source,
        channel.clone(),
        config.poll_interval,
    ));
    let provisioner = Arc::new(ProvisioningClient::new(
        channel.clone(),
        config.provision_timeout,
    ));
    let rate_service = Arc::new(RateService::new(repository, provisioner));

    let shutdown = CancellationToken::new();
    let ingestion_task = tokio::spawn({
        let token = shutdown.clone();
        async move { ingestion.run(token).await }
    });

    let state = Arc::new(AppState { rate_service });
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    log::info!("Listening on {}", config.listen_addr);

    axum::serve(listener, app_router(state))
        .with_graceful_shutdown({
            let token = shutdown.clone();
            async move {
                let _ = tokio::signal::ctrl_c().await;
                log::info!("Shutdown signal received");
                token.cancel();
            }
        })
        .await?;

    shutdown.cancel();
    ingestion_task.await?;
    Ok(())
}
