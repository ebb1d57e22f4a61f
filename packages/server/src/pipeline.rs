//! Turning an accepted upload into a stored prediction record.
//!
//! Images are written to the image store, the batch goes through the
//! inference gateway, and the record is created in one write. If the request
//! future is dropped midway, no record exists; written images stay in the
//! content-addressed store and are reused by identical uploads.

use chrono::Utc;
use leafwatch_common::inference::InferenceImage;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::AppError;
use crate::intake::PredictionUpload;
use crate::state::AppState;
use crate::store::{ImageRef, NewPredictionRecord, PredictionRecord};

#[instrument(skip(state, upload), fields(owner_id = %owner_id, images = upload.batch.len()))]
pub async fn ingest(
    state: &AppState,
    owner_id: Uuid,
    upload: PredictionUpload,
) -> Result<PredictionRecord, AppError> {
    let mut images = Vec::with_capacity(upload.batch.len());
    for image in upload.batch.images() {
        let stored = state.images.put(&image.data).await?;
        images.push(ImageRef {
            filename: image.filename.clone(),
            path: stored.path.to_string_lossy().into_owned(),
            content_hash: stored.key.to_hex(),
            size: stored.size,
            uploaded_at: Utc::now(),
        });
    }

    let inference_images: Vec<InferenceImage> = images
        .iter()
        .map(|i| InferenceImage {
            filename: i.filename.clone(),
            path: i.path.clone(),
        })
        .collect();
    let predictions = state.gateway.classify(&inference_images).await;

    let record = state
        .predictions
        .create(NewPredictionRecord {
            owner_id,
            farm_id: upload.farm_id,
            images,
            predictions,
            notes: upload.notes,
        })
        .await?;

    info!(
        prediction_id = %record.id,
        status = %record.summary.overall_status,
        "Prediction stored"
    );
    Ok(record)
}
