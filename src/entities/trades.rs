//! `SeaORM` Entity for the trades table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "trades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub asset0: String,
    /// Raw integer amount of `asset0`, decimal string
    pub amount0: String,
    pub asset1: String,
    /// Raw integer amount of `asset1`, decimal string
    pub amount1: String,
    /// Unix seconds
    pub timestamp: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
