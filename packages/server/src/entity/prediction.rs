use leafwatch_common::OverallStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prediction")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub owner_id: Uuid,

    /// Not a foreign key: deleting a farm leaves its predictions in place.
    pub farm_id: Option<Uuid>,

    /// JSON array of `{filename, path, contentHash, size, uploadedAt}`.
    #[sea_orm(column_type = "JsonBinary")]
    pub images: serde_json::Value,

    /// JSON array of per-image classifier results, in image order.
    #[sea_orm(column_type = "JsonBinary")]
    pub predictions: serde_json::Value,

    pub overall_status: OverallStatus,
    pub healthy_count: i32,
    pub diseased_count: i32,

    #[sea_orm(column_type = "Text")]
    pub notes: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
