use chrono::{DateTime, Utc};
use leafwatch_common::{ImagePrediction, OverallStatus, StatusSummary};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One uploaded image of a prediction record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Filename as uploaded.
    #[schema(example = "leaf-1.jpg")]
    pub filename: String,
    /// Absolute path in the shared image store.
    #[schema(example = "/srv/leafwatch/uploads/3f/9a0c...")]
    pub path: String,
    /// Hex SHA-256 of the image bytes.
    pub content_hash: String,
    #[schema(example = 48213)]
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// A persisted prediction batch. Never updated after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub farm_id: Option<Uuid>,
    pub images: Vec<ImageRef>,
    pub predictions: Vec<ImagePrediction>,
    pub summary: StatusSummary,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input to [`PredictionStore::create`](super::PredictionStore::create).
#[derive(Clone, Debug)]
pub struct NewPredictionRecord {
    pub owner_id: Uuid,
    pub farm_id: Option<Uuid>,
    pub images: Vec<ImageRef>,
    pub predictions: Vec<ImagePrediction>,
    pub notes: Option<String>,
}

impl NewPredictionRecord {
    /// Assign identity and timestamps and derive the status summary.
    ///
    /// Every backend goes through here, so the summary can never be set by a caller.
    pub fn into_record(self, now: DateTime<Utc>) -> PredictionRecord {
        let mut summary = StatusSummary::default();
        summary.refresh(&self.predictions);

        PredictionRecord {
            id: Uuid::now_v7(),
            owner_id: self.owner_id,
            farm_id: self.farm_id,
            images: self.images,
            predictions: self.predictions,
            summary,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Number of records per derived status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub healthy: u64,
    pub diseased: u64,
    pub mixed: u64,
}

impl StatusCounts {
    pub fn tally(statuses: impl IntoIterator<Item = OverallStatus>) -> Self {
        let mut counts = Self::default();
        for status in statuses {
            counts.add(status, 1);
        }
        counts
    }

    pub fn add(&mut self, status: OverallStatus, n: u64) {
        match status {
            OverallStatus::Healthy => self.healthy += n,
            OverallStatus::Diseased => self.diseased += n,
            OverallStatus::Mixed => self.mixed += n,
        }
    }
}

/// Record count of one owner, as returned by `top_owners`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnerCount {
    pub owner_id: Uuid,
    pub count: u64,
}

/// Rank owners by record count, highest first, ties broken by owner id.
pub(crate) fn rank_owners(owners: impl IntoIterator<Item = Uuid>, limit: u64) -> Vec<OwnerCount> {
    let mut counts: std::collections::HashMap<Uuid, u64> = std::collections::HashMap::new();
    for owner in owners {
        *counts.entry(owner).or_default() += 1;
    }
    let mut ranked: Vec<OwnerCount> = counts
        .into_iter()
        .map(|(owner_id, count)| OwnerCount { owner_id, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.owner_id.cmp(&b.owner_id)));
    ranked.truncate(limit as usize);
    ranked
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema,
    EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AreaUnit {
    #[default]
    #[serde(rename = "acres")]
    #[sea_orm(string_value = "acres")]
    Acres,
    #[serde(rename = "hectares")]
    #[sea_orm(string_value = "hectares")]
    Hectares,
    #[serde(rename = "square meters")]
    #[sea_orm(string_value = "square meters")]
    SquareMeters,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema, EnumIter,
    DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum IrrigationType {
    #[sea_orm(string_value = "drip")]
    Drip,
    #[sea_orm(string_value = "sprinkler")]
    Sprinkler,
    #[sea_orm(string_value = "flood")]
    Flood,
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Farm {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub farm_name: String,
    pub location: String,
    pub area: f64,
    pub area_unit: AreaUnit,
    pub crop_type: String,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<IrrigationType>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated farm ready to be stored.
#[derive(Clone, Debug, PartialEq)]
pub struct NewFarm {
    pub farmer_id: Uuid,
    pub farm_name: String,
    pub location: String,
    pub area: f64,
    pub area_unit: AreaUnit,
    pub crop_type: String,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<IrrigationType>,
    pub description: Option<String>,
}

impl NewFarm {
    pub fn into_farm(self, now: DateTime<Utc>) -> Farm {
        Farm {
            id: Uuid::now_v7(),
            farmer_id: self.farmer_id,
            farm_name: self.farm_name,
            location: self.location,
            area: self.area,
            area_unit: self.area_unit,
            crop_type: self.crop_type,
            soil_type: self.soil_type,
            irrigation_type: self.irrigation_type,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial farm update. Outer `None` leaves a field unchanged; for nullable
/// fields `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FarmChanges {
    pub farm_name: Option<String>,
    pub location: Option<String>,
    pub area: Option<f64>,
    pub area_unit: Option<AreaUnit>,
    pub crop_type: Option<String>,
    pub soil_type: Option<Option<String>>,
    pub irrigation_type: Option<Option<IrrigationType>>,
    pub description: Option<Option<String>>,
}

impl FarmChanges {
    pub fn apply(self, farm: &mut Farm, now: DateTime<Utc>) {
        if let Some(v) = self.farm_name {
            farm.farm_name = v;
        }
        if let Some(v) = self.location {
            farm.location = v;
        }
        if let Some(v) = self.area {
            farm.area = v;
        }
        if let Some(v) = self.area_unit {
            farm.area_unit = v;
        }
        if let Some(v) = self.crop_type {
            farm.crop_type = v;
        }
        if let Some(v) = self.soil_type {
            farm.soil_type = v;
        }
        if let Some(v) = self.irrigation_type {
            farm.irrigation_type = v;
        }
        if let Some(v) = self.description {
            farm.description = v;
        }
        farm.updated_at = now;
    }
}

/// Farmer profile, keyed by the token subject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Farmer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// First time the farmer wrote data.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity taken from verified token claims.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FarmerProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}
