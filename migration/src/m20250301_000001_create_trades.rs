use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Written by the ingestion path; this service only reads it
        manager
            .create_table(
                Table::create()
                    .table(Trades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Trades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Trades::Asset0).string_len(66).not_null())
                    // Raw integer amounts, kept as text to avoid precision loss
                    .col(ColumnDef::new(Trades::Amount0).string().not_null())
                    .col(ColumnDef::new(Trades::Asset1).string_len(66).not_null())
                    .col(ColumnDef::new(Trades::Amount1).string().not_null())
                    .col(ColumnDef::new(Trades::Timestamp).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trades_pair_timestamp")
                    .table(Trades::Table)
                    .col(Trades::Asset0)
                    .col(Trades::Asset1)
                    .col(Trades::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trades_timestamp")
                    .table(Trades::Table)
                    .col(Trades::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trades::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Trades {
    Table,
    Id,
    Asset0,
    Amount0,
    Asset1,
    Amount1,
    Timestamp,
}
