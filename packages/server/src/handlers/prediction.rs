use std::collections::HashMap;

use axum::body::Body;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{StatusCode, header};
use axum::Json;
use axum::response::{IntoResponse, Response};
use leafwatch_common::storage::ImageKey;
use tokio_util::io::ReaderStream;
use tracing::instrument;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::multipart::AppMultipart;
use crate::extractors::path::AppPath;
use crate::guard::{self, AccessScope};
use crate::intake;
use crate::models::prediction::{FarmSummary, PredictionListResponse, PredictionResponse};
use crate::models::shared::MessageResponse;
use crate::pipeline;
use crate::state::AppState;
use crate::store::PredictionRecord;
use crate::utils::filename::content_disposition_value;

/// Room for a full batch of maximum-size images plus the text fields.
pub fn upload_body_limit(config: &AppConfig) -> DefaultBodyLimit {
    let images = config.prediction.max_images as u64 * config.storage.max_image_size;
    DefaultBodyLimit::max((images + 1024 * 1024) as usize)
}

#[utoipa::path(
    post,
    path = "/predict",
    tag = "Predictions",
    operation_id = "createPrediction",
    summary = "Upload leaf images for disease prediction",
    description = "Accepts 1-10 `images` parts plus optional `farmId` and `notes` text parts. \
        Images are classified by the inference service; if it is unavailable or too slow, \
        every image is recorded as `ML_SERVICE_UNAVAILABLE` and the record is still created.",
    request_body(content_type = "multipart/form-data", description = "Images with optional farmId and notes"),
    responses(
        (status = 201, description = "Prediction created", body = PredictionResponse),
        (status = 400, description = "No images (INVALID_BATCH) or invalid upload (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a farmer (PERMISSION_DENIED) or farm not owned (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Farm not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = %auth_user.user_id))]
pub async fn create_prediction(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_farmer()?;

    let upload = intake::read_upload(&mut multipart, state.upload_limits()).await?;

    // The farm must belong to the caller before anything is stored.
    let farm = match upload.farm_id {
        Some(farm_id) => {
            let farm = guard::require_access(
                state.farms.get(farm_id).await?,
                |f| f.farmer_id,
                auth_user.scope(),
                "farm",
            )?;
            Some(FarmSummary::from(&farm))
        }
        None => None,
    };

    state.farmers.upsert(auth_user.profile()).await?;

    let record = pipeline::ingest(&state, auth_user.user_id, upload).await?;

    Ok((
        StatusCode::CREATED,
        Json(PredictionResponse::new(record, farm)),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Predictions",
    operation_id = "listPredictions",
    summary = "List the caller's predictions",
    description = "Returns every prediction submitted by the calling farmer, newest first.",
    responses(
        (status = 200, description = "Prediction list", body = PredictionListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a farmer (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_predictions(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<PredictionListResponse>, AppError> {
    auth_user.require_farmer()?;

    let records = state.predictions.list_by_owner(auth_user.user_id).await?;
    Ok(Json(with_farms(&state, records).await?.into()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Predictions",
    operation_id = "getPrediction",
    summary = "Get a prediction",
    params(("id" = Uuid, Path, description = "Prediction ID")),
    responses(
        (status = 200, description = "Prediction", body = PredictionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a farmer (PERMISSION_DENIED) or not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Prediction not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(prediction_id = %id))]
pub async fn get_prediction(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<PredictionResponse>, AppError> {
    auth_user.require_farmer()?;

    let record = find_prediction(&state, id, auth_user.scope()).await?;
    Ok(Json(with_farm(&state, record).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Predictions",
    operation_id = "deletePrediction",
    summary = "Delete a prediction",
    description = "Removes the record. Stored images are kept; identical uploads share them.",
    params(("id" = Uuid, Path, description = "Prediction ID")),
    responses(
        (status = 200, description = "Prediction deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a farmer (PERMISSION_DENIED) or not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Prediction not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(prediction_id = %id))]
pub async fn delete_prediction(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_farmer()?;

    find_prediction(&state, id, auth_user.scope()).await?;
    state.predictions.delete(id).await?;

    Ok(Json(MessageResponse::new("Prediction deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/{id}/images/{index}",
    tag = "Predictions",
    operation_id = "downloadPredictionImage",
    summary = "Download an image of a prediction",
    description = "Streams the stored image at position `index` of the batch. \
        Available to the owning farmer and to admins.",
    params(
        ("id" = Uuid, Path, description = "Prediction ID"),
        ("index" = usize, Path, description = "Zero-based image position"),
    ),
    responses(
        (status = 200, description = "Image content"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Prediction or image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(prediction_id = %id, index = index))]
pub async fn download_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath((id, index)): AppPath<(Uuid, usize)>,
) -> Result<Response, AppError> {
    let record = find_prediction(&state, id, auth_user.scope()).await?;
    let image = record
        .images
        .get(index)
        .ok_or_else(|| AppError::NotFound("Image not found".into()))?;

    let key = ImageKey::parse(&image.content_hash)
        .map_err(|e| AppError::Internal(format!("Bad image key on {id}: {e}")))?;
    let reader = state.images.open(&key).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = mime_guess::from_path(&image.filename)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, image.size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&image.filename),
        )
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

/// Load a record the caller may access: `NotFound` before `Forbidden`.
pub(crate) async fn find_prediction(
    state: &AppState,
    id: Uuid,
    scope: AccessScope,
) -> Result<PredictionRecord, AppError> {
    guard::require_access(
        state.predictions.get(id).await?,
        |r| r.owner_id,
        scope,
        "prediction",
    )
}

/// Attach the linked farm, if it still exists.
pub(crate) async fn with_farm(
    state: &AppState,
    record: PredictionRecord,
) -> Result<PredictionResponse, AppError> {
    let farm = match record.farm_id {
        Some(farm_id) => state
            .farms
            .get(farm_id)
            .await?
            .map(|f| FarmSummary::from(&f)),
        None => None,
    };
    Ok(PredictionResponse::new(record, farm))
}

/// Attach linked farms to many records, looking each farm up once.
pub(crate) async fn with_farms(
    state: &AppState,
    records: Vec<PredictionRecord>,
) -> Result<Vec<PredictionResponse>, AppError> {
    let mut farms: HashMap<Uuid, Option<FarmSummary>> = HashMap::new();
    for farm_id in records.iter().filter_map(|r| r.farm_id) {
        if !farms.contains_key(&farm_id) {
            let farm = state.farms.get(farm_id).await?;
            farms.insert(farm_id, farm.map(|f| FarmSummary::from(&f)));
        }
    }

    Ok(records
        .into_iter()
        .map(|record| {
            let farm = record
                .farm_id
                .and_then(|id| farms.get(&id).cloned().flatten());
            PredictionResponse::new(record, farm)
        })
        .collect())
}
