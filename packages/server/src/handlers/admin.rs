use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use chrono::{Duration, Utc};
use leafwatch_common::OverallStatus;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::path::AppPath;
use crate::guard::AccessScope;
use crate::models::admin::{
    AdminStatsResponse, FarmerDetailResponse, FarmerListResponse, FarmerResponse, FarmerStats,
    OverviewStats, OwnerSummary, RecentPrediction, TopFarmer,
};
use crate::models::farm::FarmResponse;
use crate::models::prediction::{PredictionListResponse, PredictionResponse};
use crate::state::AppState;
use crate::store::Farmer;

use super::prediction::{find_prediction, with_farm, with_farms};

const RECENT_PREDICTIONS: u64 = 10;
const TOP_FARMERS: u64 = 5;
const RECENT_FARMER_DAYS: i64 = 7;

#[utoipa::path(
    get,
    path = "/farmers",
    tag = "Admin",
    operation_id = "listFarmers",
    summary = "List all farmers",
    description = "Farmers known to the service, newest first.",
    responses(
        (status = 200, description = "Farmer list", body = FarmerListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not an admin (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_farmers(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<FarmerListResponse>, AppError> {
    auth_user.require_admin()?;

    let farmers: Vec<FarmerResponse> = state
        .farmers
        .list()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(FarmerListResponse {
        count: farmers.len(),
        farmers,
    }))
}

#[utoipa::path(
    get,
    path = "/farmers/{id}",
    tag = "Admin",
    operation_id = "getFarmer",
    summary = "Get a farmer with farms, predictions and stats",
    params(("id" = Uuid, Path, description = "Farmer ID")),
    responses(
        (status = 200, description = "Farmer details", body = FarmerDetailResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not an admin (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Farmer not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(farmer_id = %id))]
pub async fn get_farmer(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<FarmerDetailResponse>, AppError> {
    auth_user.require_admin()?;

    let farmer = state
        .farmers
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Farmer not found".into()))?;

    let farms = state.farms.list_by_owner(id).await?;
    let records = state.predictions.list_by_owner(id).await?;

    let stats = FarmerStats {
        total_farms: farms.len(),
        total_predictions: records.len(),
        healthy_predictions: records
            .iter()
            .filter(|r| r.summary.overall_status == OverallStatus::Healthy)
            .count(),
        diseased_predictions: records
            .iter()
            .filter(|r| r.summary.overall_status == OverallStatus::Diseased)
            .count(),
    };

    Ok(Json(FarmerDetailResponse {
        farmer: farmer.into(),
        farms: farms.into_iter().map(FarmResponse::from).collect(),
        predictions: with_farms(&state, records).await?,
        stats,
    }))
}

#[utoipa::path(
    get,
    path = "/farmers/{id}/predictions",
    tag = "Admin",
    operation_id = "listFarmerPredictions",
    summary = "List a farmer's predictions",
    params(("id" = Uuid, Path, description = "Farmer ID")),
    responses(
        (status = 200, description = "Prediction list, newest first", body = PredictionListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not an admin (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(farmer_id = %id))]
pub async fn list_farmer_predictions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<PredictionListResponse>, AppError> {
    auth_user.require_admin()?;

    let records = state.predictions.list_by_owner(id).await?;
    Ok(Json(with_farms(&state, records).await?.into()))
}

#[utoipa::path(
    get,
    path = "/predictions/{id}",
    tag = "Admin",
    operation_id = "getAnyPrediction",
    summary = "Get any prediction",
    params(("id" = Uuid, Path, description = "Prediction ID")),
    responses(
        (status = 200, description = "Prediction", body = PredictionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not an admin (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Prediction not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(prediction_id = %id))]
pub async fn get_any_prediction(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<PredictionResponse>, AppError> {
    auth_user.require_admin()?;

    let record = find_prediction(&state, id, AccessScope::Unrestricted).await?;
    Ok(Json(with_farm(&state, record).await?))
}

#[utoipa::path(
    get,
    path = "/stats",
    tag = "Admin",
    operation_id = "getStats",
    summary = "Service-wide statistics",
    description = "Totals, farmers first seen in the last 7 days, records per status, \
        the 10 most recent predictions and the 5 farmers with the most predictions.",
    responses(
        (status = 200, description = "Statistics", body = AdminStatsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not an admin (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AdminStatsResponse>, AppError> {
    auth_user.require_admin()?;

    let since = Utc::now() - Duration::days(RECENT_FARMER_DAYS);
    let stats = OverviewStats {
        total_farmers: state.farmers.count().await?,
        total_farms: state.farms.count().await?,
        total_predictions: state.predictions.count().await?,
        recent_farmers: state.farmers.count_since(since).await?,
        prediction_stats: state.predictions.count_by_status().await?.into(),
    };

    let recent = state.predictions.list_recent(RECENT_PREDICTIONS).await?;
    let top = state.predictions.top_owners(TOP_FARMERS).await?;

    let mut owners: HashMap<Uuid, Option<Farmer>> = HashMap::new();
    for owner_id in recent
        .iter()
        .map(|r| r.owner_id)
        .chain(top.iter().map(|t| t.owner_id))
    {
        if !owners.contains_key(&owner_id) {
            owners.insert(owner_id, state.farmers.get(owner_id).await?);
        }
    }
    let owner = |id: &Uuid| owners.get(id).and_then(Option::as_ref);

    let recent_predictions = with_farms(&state, recent)
        .await?
        .into_iter()
        .map(|prediction| RecentPrediction {
            owner: owner(&prediction.owner_id).map(OwnerSummary::from),
            prediction,
        })
        .collect();

    let top_farmers = top
        .into_iter()
        .map(|t| {
            let farmer = owner(&t.owner_id);
            TopFarmer {
                farmer_id: t.owner_id,
                name: farmer.map(|f| f.name.clone()),
                email: farmer.map(|f| f.email.clone()),
                prediction_count: t.count,
            }
        })
        .collect();

    Ok(Json(AdminStatsResponse {
        stats,
        recent_predictions,
        top_farmers,
    }))
}
