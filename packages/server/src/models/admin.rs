use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::store::{Farmer, StatusCounts};

use super::farm::FarmResponse;
use super::prediction::PredictionResponse;

/// Farmer profile as seen by an admin.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FarmerResponse {
    pub id: Uuid,
    #[schema(example = "Asha Patil")]
    pub name: String,
    #[schema(example = "asha@example.com")]
    pub email: String,
    /// First time this farmer submitted data.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Farmer> for FarmerResponse {
    fn from(f: Farmer) -> Self {
        Self {
            id: f.id,
            name: f.name,
            email: f.email,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FarmerListResponse {
    #[schema(example = 12)]
    pub count: usize,
    pub farmers: Vec<FarmerResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FarmerStats {
    pub total_farms: usize,
    pub total_predictions: usize,
    pub healthy_predictions: usize,
    pub diseased_predictions: usize,
}

/// A farmer with everything they have submitted.
#[derive(Serialize, utoipa::ToSchema)]
pub struct FarmerDetailResponse {
    pub farmer: FarmerResponse,
    pub farms: Vec<FarmResponse>,
    pub predictions: Vec<PredictionResponse>,
    pub stats: FarmerStats,
}

/// Record counts per derived status.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PredictionStats {
    pub healthy: u64,
    pub diseased: u64,
    pub mixed: u64,
}

impl From<StatusCounts> for PredictionStats {
    fn from(c: StatusCounts) -> Self {
        Self {
            healthy: c.healthy,
            diseased: c.diseased,
            mixed: c.mixed,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_farmers: u64,
    pub total_farms: u64,
    pub total_predictions: u64,
    /// Farmers first seen in the last 7 days.
    pub recent_farmers: u64,
    pub prediction_stats: PredictionStats,
}

/// Name and email of a record's owner.
#[derive(Serialize, utoipa::ToSchema)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&Farmer> for OwnerSummary {
    fn from(f: &Farmer) -> Self {
        Self {
            id: f.id,
            name: f.name.clone(),
            email: f.email.clone(),
        }
    }
}

/// A recent prediction together with its owner, if known.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RecentPrediction {
    #[serde(flatten)]
    pub prediction: PredictionResponse,
    pub owner: Option<OwnerSummary>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopFarmer {
    pub farmer_id: Uuid,
    /// Null when the farmer has no directory entry.
    pub name: Option<String>,
    pub email: Option<String>,
    #[schema(example = 14)]
    pub prediction_count: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub stats: OverviewStats,
    /// The 10 most recent predictions across all farmers.
    pub recent_predictions: Vec<RecentPrediction>,
    /// The 5 farmers with the most predictions.
    pub top_farmers: Vec<TopFarmer>,
}
