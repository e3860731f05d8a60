use crate::entities::sync_state;
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait, sea_query::OnConflict};

use tracing::{debug, error};

#[derive(Clone, Debug)]
pub struct DbClient {
    pub primary: DatabaseConnection,
}

pub(crate) fn to_db_int(value: u64, field: &'static str) -> eyre::Result<i64> {
    i64::try_from(value).map_err(|_| eyre::eyre!("{field} {value} does not fit in BIGINT"))
}

impl DbClient {
    pub fn new(primary: DatabaseConnection) -> Self {
        Self { primary }
    }

    /// Last processed block for `name`, or `None` when the key was never written.
    pub async fn get_sync_state(&self, name: &str) -> eyre::Result<Option<u64>> {
        let res = sync_state::Entity::find_by_id(name.to_owned())
            .one(&self.primary)
            .await?;

        res.map(|r| {
            u64::try_from(r.block_number)
                .map_err(|_| eyre::eyre!("Negative block number stored for {name}"))
        })
        .transpose()
    }

    pub async fn upsert_sync_state(&self, name: &str, block_number: u64) -> eyre::Result<()> {
        let model = sync_state::ActiveModel {
            name: Set(name.to_owned()),
            block_number: Set(to_db_int(block_number, "block_number")?),
        };

        sync_state::Entity::insert(model)
            .on_conflict(
                OnConflict::column(sync_state::Column::Name)
                    .update_column(sync_state::Column::BlockNumber)
                    .to_owned(),
            )
            .exec_without_returning(&self.primary)
            .await
            .map_err(|e| {
                error!("Failed to upsert sync state for {}: {:?}", name, e);
                eyre::eyre!("Failed to upsert sync state for {}: {:?}", name, e)
            })?;

        debug!(name, block_number, "Sync state updated");
        Ok(())
    }
}
