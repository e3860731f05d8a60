use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const TX_LOG_UNIQUE_INDEX: &str = "uq_event_log_tx_hash_log_index";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventLog::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventLog::TxHash).string().not_null())
                    .col(ColumnDef::new(EventLog::LogIndex).big_integer().not_null())
                    .col(
                        ColumnDef::new(EventLog::BlockNumber)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EventLog::Event).string().not_null())
                    .col(ColumnDef::new(EventLog::EventArgs).text().not_null()) // serialized attribute map
                    .col(ColumnDef::new(EventLog::Contract).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(TX_LOG_UNIQUE_INDEX)
                    .table(EventLog::Table)
                    .col(EventLog::TxHash)
                    .col(EventLog::LogIndex)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EventLog {
    Table,
    Id,
    TxHash,
    LogIndex,
    BlockNumber,
    Event,
    EventArgs,
    Contract,
}
