use std::sync::Arc;

use alloy::{
    primitives::{Address, B256},
    providers::{Provider, ProviderBuilder, WsConnect},
    rpc::types::{Filter, Log},
};
use async_trait::async_trait;
use tracing::info;

/// The two chain queries a replay pass needs.
#[async_trait]
pub trait LogProvider: Send + Sync {
    async fn get_block_number(&self) -> eyre::Result<u64>;

    /// Logs emitted by `address` with topic0 `signature` in `[from_block, to_block]`.
    async fn get_logs(
        &self,
        address: Address,
        signature: B256,
        from_block: u64,
        to_block: u64,
    ) -> eyre::Result<Vec<Log>>;
}

#[derive(Clone)]
pub struct EvmProvider {
    ws: Arc<dyn Provider + Send + Sync>,
}

impl EvmProvider {
    pub async fn connect(ws_url: &str) -> eyre::Result<Self> {
        let provider = ProviderBuilder::new()
            .on_ws(WsConnect::new(ws_url.to_string()))
            .await?;
        info!("Connected to {}", ws_url);

        let ws: Arc<dyn Provider + Send + Sync> = Arc::new(provider);
        Ok(Self { ws })
    }
}

#[async_trait]
impl LogProvider for EvmProvider {
    async fn get_block_number(&self) -> eyre::Result<u64> {
        self.ws.get_block_number().await.map_err(Into::into)
    }

    async fn get_logs(
        &self,
        address: Address,
        signature: B256,
        from_block: u64,
        to_block: u64,
    ) -> eyre::Result<Vec<Log>> {
        let filter = Filter::new()
            .address(address)
            .event_signature(signature)
            .from_block(from_block)
            .to_block(to_block);

        self.ws
            .get_logs(&filter)
            .await
            .map_err(eyre::Report::from)
    }
}
