//! SeaORM Entity for persisted OHLCV candles

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "candles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Catalog symbol, e.g. "BTC/USDC"
    pub symbol: String,
    /// Resolution label, e.g. "30" or "1D"
    pub resolution: String,
    /// Bucket start, Unix seconds
    pub t: i64,
    #[sea_orm(column_type = "Decimal(Some((78, 18)))")]
    pub o: Decimal,
    #[sea_orm(column_type = "Decimal(Some((78, 18)))")]
    pub h: Decimal,
    #[sea_orm(column_type = "Decimal(Some((78, 18)))")]
    pub l: Decimal,
    #[sea_orm(column_type = "Decimal(Some((78, 18)))")]
    pub c: Decimal,
    #[sea_orm(column_type = "Decimal(Some((78, 18)))")]
    pub v: Decimal,
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
