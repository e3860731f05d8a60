use std::sync::Arc;

use alloy::primitives::Address;
use common::{
    config::{IndexerConfig, LoadFromEnv},
    indexer::ReplaySettings,
};
use database::client::DbClient;
use evm::{indexer::EvmIndexer, provider::EvmProvider};
use eyre::{Result, WrapErr};
use generic_indexer::indexer::ChainIndexer;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = IndexerConfig::from_env()?;

    let db_conn = database::connect::connect(&cfg.database.url).await?;
    info!("Connected to Indexer's DB");
    database::connect::migrate(&db_conn).await?;
    let arc_db = Arc::new(DbClient::new(db_conn));

    let contract: Address = cfg
        .eth
        .contract_address
        .parse()
        .wrap_err_with(|| format!("Invalid contract address {}", cfg.eth.contract_address))?;
    let settings = ReplaySettings::from(&cfg.eth);

    let provider = EvmProvider::connect(&cfg.eth.ws_url)
        .await
        .wrap_err("Failed to dial the chain client")?;

    let indexer = EvmIndexer::new(
        Arc::new(provider),
        arc_db.clone(),
        arc_db,
        contract,
        &cfg.eth.source,
        settings,
    );
    let settings = indexer.get_replay_settings();
    info!(
        "Replaying {} from block {} with {} confirmations every {:?}",
        indexer.checkpoint_key(),
        settings.start_block,
        settings.confirmations,
        settings.interval
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { indexer.run(cancel).await }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    cancel.cancel();

    if let Err(e) = handle.await {
        if e.is_panic() {
            error!("Indexer task panicked: {:?}", e);
        } else {
            error!("Indexer task was cancelled: {:?}", e);
        }
    }

    Ok(())
}
