use sea_orm::{
    ActiveValue::Set, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};
use tracing::error;

use crate::{
    client::{DbClient, to_db_int},
    entities::event_log,
    store::EventRecord,
};

impl DbClient {
    /// Inserts the record unless a row with the same `(tx_hash, log_index)` exists.
    ///
    /// Returns `true` when a new row was written.
    pub async fn insert_event_log(&self, record: EventRecord) -> eyre::Result<bool> {
        let model = event_log::ActiveModel {
            tx_hash: Set(record.tx_hash.clone()),
            log_index: Set(to_db_int(record.log_index, "log_index")?),
            block_number: Set(to_db_int(record.block_number, "block_number")?),
            event: Set(record.event),
            event_args: Set(record.event_args),
            contract: Set(record.contract),
            ..Default::default()
        };

        let rows = event_log::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([event_log::Column::TxHash, event_log::Column::LogIndex])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.primary)
            .await
            .map_err(|e: DbErr| {
                error!(
                    "Failed to insert event log {}:{}: {:?}",
                    record.tx_hash, record.log_index, e
                );
                eyre::eyre!("Failed to insert event log: {:?}", e)
            })?;

        Ok(rows > 0)
    }

    pub async fn find_event_log(
        &self,
        tx_hash: &str,
        log_index: u64,
    ) -> eyre::Result<Option<event_log::Model>> {
        let res = event_log::Entity::find()
            .filter(event_log::Column::TxHash.eq(tx_hash))
            .filter(event_log::Column::LogIndex.eq(to_db_int(log_index, "log_index")?))
            .one(&self.primary)
            .await?;
        Ok(res)
    }

    /// All rows emitted by `contract`, ordered by block then log index.
    pub async fn event_logs_by_contract(
        &self,
        contract: &str,
    ) -> eyre::Result<Vec<event_log::Model>> {
        let rows = event_log::Entity::find()
            .filter(event_log::Column::Contract.eq(contract))
            .order_by_asc(event_log::Column::BlockNumber)
            .order_by_asc(event_log::Column::LogIndex)
            .all(&self.primary)
            .await?;
        Ok(rows)
    }

    pub async fn count_event_logs(&self) -> eyre::Result<u64> {
        Ok(event_log::Entity::find().count(&self.primary).await?)
    }
}
