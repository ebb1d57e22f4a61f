use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::json::Validate;
use crate::store::{AreaUnit, Farm, FarmChanges, IrrigationType, NewFarm};

use super::shared::{double_option, normalize_optional, validate_required_text};

/// Crop recorded when a farm is created without one.
pub const DEFAULT_CROP_TYPE: &str = "Tomato";

const MAX_NAME_LEN: usize = 256;

/// Request body for registering a farm.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFarmRequest {
    #[schema(example = "North Field")]
    pub farm_name: String,
    #[schema(example = "Nashik, Maharashtra")]
    pub location: String,
    /// Cultivated area, in `areaUnit`. Must be >= 0.
    #[schema(example = 2.5)]
    pub area: f64,
    /// Defaults to `acres`.
    pub area_unit: Option<AreaUnit>,
    /// Defaults to `Tomato`.
    #[schema(example = "Tomato")]
    pub crop_type: Option<String>,
    #[schema(example = "Black cotton")]
    pub soil_type: Option<String>,
    pub irrigation_type: Option<IrrigationType>,
    pub description: Option<String>,
}

fn validate_area(area: f64) -> Result<(), AppError> {
    if !area.is_finite() || area < 0.0 {
        return Err(AppError::Validation("Area must be a number >= 0".into()));
    }
    Ok(())
}

impl Validate for CreateFarmRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.farm_name, "Farm name", MAX_NAME_LEN)?;
        validate_required_text(&self.location, "Location", MAX_NAME_LEN)?;
        validate_area(self.area)
    }
}

impl CreateFarmRequest {
    pub fn into_new_farm(self, farmer_id: Uuid) -> NewFarm {
        NewFarm {
            farmer_id,
            farm_name: self.farm_name.trim().to_string(),
            location: self.location.trim().to_string(),
            area: self.area,
            area_unit: self.area_unit.unwrap_or_default(),
            crop_type: normalize_optional(self.crop_type)
                .unwrap_or_else(|| DEFAULT_CROP_TYPE.to_string()),
            soil_type: normalize_optional(self.soil_type),
            irrigation_type: self.irrigation_type,
            description: normalize_optional(self.description),
        }
    }
}

/// Request body for updating a farm. Absent fields are left unchanged;
/// `null` clears an optional field.
#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFarmRequest {
    pub farm_name: Option<String>,
    pub location: Option<String>,
    pub area: Option<f64>,
    pub area_unit: Option<AreaUnit>,
    pub crop_type: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub soil_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub irrigation_type: Option<Option<IrrigationType>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl Validate for UpdateFarmRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.farm_name {
            validate_required_text(name, "Farm name", MAX_NAME_LEN)?;
        }
        if let Some(location) = &self.location {
            validate_required_text(location, "Location", MAX_NAME_LEN)?;
        }
        if let Some(area) = self.area {
            validate_area(area)?;
        }
        if let Some(crop) = &self.crop_type {
            validate_required_text(crop, "Crop type", MAX_NAME_LEN)?;
        }
        Ok(())
    }
}

impl From<UpdateFarmRequest> for FarmChanges {
    fn from(req: UpdateFarmRequest) -> Self {
        Self {
            farm_name: req.farm_name.map(|v| v.trim().to_string()),
            location: req.location.map(|v| v.trim().to_string()),
            area: req.area,
            area_unit: req.area_unit,
            crop_type: req.crop_type.map(|v| v.trim().to_string()),
            soil_type: req.soil_type.map(normalize_optional),
            irrigation_type: req.irrigation_type,
            description: req.description.map(normalize_optional),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FarmResponse {
    pub id: Uuid,
    pub farmer_id: Uuid,
    #[schema(example = "North Field")]
    pub farm_name: String,
    #[schema(example = "Nashik, Maharashtra")]
    pub location: String,
    #[schema(example = 2.5)]
    pub area: f64,
    pub area_unit: AreaUnit,
    #[schema(example = "Tomato")]
    pub crop_type: String,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<IrrigationType>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Farm> for FarmResponse {
    fn from(f: Farm) -> Self {
        Self {
            id: f.id,
            farmer_id: f.farmer_id,
            farm_name: f.farm_name,
            location: f.location,
            area: f.area,
            area_unit: f.area_unit,
            crop_type: f.crop_type,
            soil_type: f.soil_type,
            irrigation_type: f.irrigation_type,
            description: f.description,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FarmListResponse {
    #[schema(example = 1)]
    pub count: usize,
    pub farms: Vec<FarmResponse>,
}

impl From<Vec<Farm>> for FarmListResponse {
    fn from(farms: Vec<Farm>) -> Self {
        Self {
            count: farms.len(),
            farms: farms.into_iter().map(FarmResponse::from).collect(),
        }
    }
}
