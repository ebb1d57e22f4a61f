use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::ValidJson;
use crate::extractors::path::AppPath;
use crate::guard;
use crate::models::farm::{CreateFarmRequest, FarmListResponse, FarmResponse, UpdateFarmRequest};
use crate::models::shared::MessageResponse;
use crate::state::AppState;
use crate::store::Farm;

#[utoipa::path(
    post,
    path = "/",
    tag = "Farms",
    operation_id = "createFarm",
    summary = "Register a farm",
    description = "Creates a farm owned by the calling farmer. `areaUnit` defaults to `acres` \
        and `cropType` to `Tomato`.",
    request_body = CreateFarmRequest,
    responses(
        (status = 201, description = "Farm created", body = FarmResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a farmer (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_farm(
    auth_user: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateFarmRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_farmer()?;

    state.farmers.upsert(auth_user.profile()).await?;
    let farm = state
        .farms
        .create(payload.into_new_farm(auth_user.user_id))
        .await?;

    Ok((StatusCode::CREATED, Json(FarmResponse::from(farm))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Farms",
    operation_id = "listFarms",
    summary = "List the caller's farms",
    responses(
        (status = 200, description = "Farm list, newest first", body = FarmListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a farmer (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_farms(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<FarmListResponse>, AppError> {
    auth_user.require_farmer()?;

    let farms = state.farms.list_by_owner(auth_user.user_id).await?;
    Ok(Json(farms.into()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Farms",
    operation_id = "getFarm",
    summary = "Get a farm",
    params(("id" = Uuid, Path, description = "Farm ID")),
    responses(
        (status = 200, description = "Farm", body = FarmResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a farmer (PERMISSION_DENIED) or not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Farm not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(farm_id = %id))]
pub async fn get_farm(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<FarmResponse>, AppError> {
    auth_user.require_farmer()?;

    let farm = find_farm(&state, &auth_user, id).await?;
    Ok(Json(farm.into()))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Farms",
    operation_id = "updateFarm",
    summary = "Update a farm",
    description = "Partial update: absent fields are unchanged, `null` clears `soilType`, \
        `irrigationType` or `description`.",
    params(("id" = Uuid, Path, description = "Farm ID")),
    request_body = UpdateFarmRequest,
    responses(
        (status = 200, description = "Updated farm", body = FarmResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a farmer (PERMISSION_DENIED) or not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Farm not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(farm_id = %id))]
pub async fn update_farm(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    ValidJson(payload): ValidJson<UpdateFarmRequest>,
) -> Result<Json<FarmResponse>, AppError> {
    auth_user.require_farmer()?;

    find_farm(&state, &auth_user, id).await?;
    state.farmers.upsert(auth_user.profile()).await?;
    let farm = state.farms.update(id, payload.into()).await?;

    Ok(Json(farm.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Farms",
    operation_id = "deleteFarm",
    summary = "Delete a farm",
    description = "Predictions linked to the farm are kept and show `farm: null` afterwards.",
    params(("id" = Uuid, Path, description = "Farm ID")),
    responses(
        (status = 200, description = "Farm deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a farmer (PERMISSION_DENIED) or not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Farm not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(farm_id = %id))]
pub async fn delete_farm(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_farmer()?;

    find_farm(&state, &auth_user, id).await?;
    state.farms.delete(id).await?;

    Ok(Json(MessageResponse::new("Farm deleted successfully")))
}

async fn find_farm(state: &AppState, auth_user: &AuthUser, id: Uuid) -> Result<Farm, AppError> {
    guard::require_access(
        state.farms.get(id).await?,
        |f| f.farmer_id,
        auth_user.scope(),
        "farm",
    )
}
