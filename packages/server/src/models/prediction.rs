use chrono::{DateTime, Utc};
use leafwatch_common::{ImagePrediction, OverallStatus};
use serde::Serialize;
use uuid::Uuid;

use crate::store::{Farm, ImageRef, PredictionRecord};

/// Farm fields embedded in prediction responses.
#[derive(Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FarmSummary {
    pub id: Uuid,
    #[schema(example = "North Field")]
    pub farm_name: String,
    #[schema(example = "Nashik, Maharashtra")]
    pub location: String,
}

impl From<&Farm> for FarmSummary {
    fn from(farm: &Farm) -> Self {
        Self {
            id: farm.id,
            farm_name: farm.farm_name.clone(),
            location: farm.location.clone(),
        }
    }
}

/// A prediction record as returned by the API.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub id: Uuid,
    /// Farmer who submitted the batch.
    pub owner_id: Uuid,
    /// Linked farm, or null if none was given or the farm has since been deleted.
    pub farm: Option<FarmSummary>,
    pub images: Vec<ImageRef>,
    /// One entry per image, same order as `images`.
    pub predictions: Vec<ImagePrediction>,
    pub overall_status: OverallStatus,
    #[schema(example = 1)]
    pub healthy_count: u32,
    #[schema(example = 1)]
    pub diseased_count: u32,
    #[schema(example = "Leaves from the east rows after heavy rain")]
    pub notes: Option<String>,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PredictionResponse {
    pub fn new(record: PredictionRecord, farm: Option<FarmSummary>) -> Self {
        Self {
            id: record.id,
            owner_id: record.owner_id,
            farm,
            images: record.images,
            predictions: record.predictions,
            overall_status: record.summary.overall_status,
            healthy_count: record.summary.healthy_count,
            diseased_count: record.summary.diseased_count,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Predictions of one farmer, newest first.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PredictionListResponse {
    #[schema(example = 2)]
    pub count: usize,
    pub predictions: Vec<PredictionResponse>,
}

impl From<Vec<PredictionResponse>> for PredictionListResponse {
    fn from(predictions: Vec<PredictionResponse>) -> Self {
        Self {
            count: predictions.len(),
            predictions,
        }
    }
}
