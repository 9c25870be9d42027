use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Candles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Candles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Candles::Symbol).string_len(32).not_null())
                    .col(ColumnDef::new(Candles::Resolution).string_len(4).not_null())
                    .col(ColumnDef::new(Candles::T).big_integer().not_null())
                    .col(ColumnDef::new(Candles::O).decimal_len(78, 18).not_null())
                    .col(ColumnDef::new(Candles::H).decimal_len(78, 18).not_null())
                    .col(ColumnDef::new(Candles::L).decimal_len(78, 18).not_null())
                    .col(ColumnDef::new(Candles::C).decimal_len(78, 18).not_null())
                    .col(ColumnDef::new(Candles::V).decimal_len(78, 18).not_null())
                    .col(
                        ColumnDef::new(Candles::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        // Latest-candle lookup: (symbol, resolution, t DESC)
        manager
            .create_index(
                Index::create()
                    .name("idx_candles_series_t")
                    .table(Candles::Table)
                    .col(Candles::Symbol)
                    .col(Candles::Resolution)
                    .col((Candles::T, IndexOrder::Desc))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Candles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Candles {
    Table,
    Id,
    Symbol,
    Resolution,
    T,
    O,
    H,
    L,
    C,
    V,
    CreatedAt,
}
