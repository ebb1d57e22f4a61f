use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::store::{AreaUnit, IrrigationType};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "farm")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub farmer_id: Uuid,

    pub farm_name: String,
    pub location: String,
    pub area: f64,
    pub area_unit: AreaUnit,
    pub crop_type: String,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<IrrigationType>,

    #[sea_orm(column_type = "Text")]
    pub description: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
