//! Reading a prediction upload off a multipart request.
//!
//! Parts:
//! - `images`: 1 to `prediction.max_images` files, in submission order
//! - `farmId`: optional farm UUID (an empty value means no farm)
//! - `notes`: optional free text
//!
//! Unknown parts are ignored.

use axum::extract::Multipart;
use axum::extract::multipart::Field;
use uuid::Uuid;

use crate::error::AppError;
use crate::utils::filename::image_filename;

/// Upload limits enforced while the body streams in.
#[derive(Clone, Copy, Debug)]
pub struct UploadLimits {
    pub max_images: usize,
    pub max_image_size: u64,
}

/// One image exactly as received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedImage {
    pub filename: String,
    pub data: Vec<u8>,
}

/// A non-empty, ordered batch of images.
#[derive(Debug)]
pub struct ImageBatch {
    images: Vec<UploadedImage>,
}

impl ImageBatch {
    pub fn new(images: Vec<UploadedImage>) -> Result<Self, AppError> {
        if images.is_empty() {
            return Err(AppError::InvalidBatch(
                "Please upload at least one image".into(),
            ));
        }
        Ok(Self { images })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn images(&self) -> &[UploadedImage] {
        &self.images
    }
}

/// Everything a farmer submits for one prediction.
#[derive(Debug)]
pub struct PredictionUpload {
    pub batch: ImageBatch,
    pub farm_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Read the whole upload, rejecting it as soon as a limit is crossed.
pub async fn read_upload(
    multipart: &mut Multipart,
    limits: UploadLimits,
) -> Result<PredictionUpload, AppError> {
    let mut images = Vec::new();
    let mut farm_id = None;
    let mut notes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("images") => {
                if images.len() >= limits.max_images {
                    return Err(AppError::Validation(format!(
                        "Too many images: at most {} per upload",
                        limits.max_images
                    )));
                }
                let filename = image_filename(field.file_name(), images.len())
                    .map_err(|e| AppError::Validation(e.message().into()))?;
                let data = read_image(field, images.len(), limits.max_image_size).await?;
                images.push(UploadedImage { filename, data });
            }
            Some("farmId") => {
                farm_id = parse_farm_id(&read_text(field).await?)?;
            }
            Some("notes") => {
                notes = Some(read_text(field).await?.trim().to_string())
                    .filter(|n| !n.is_empty());
            }
            _ => {} // Ignore unknown fields.
        }
    }

    Ok(PredictionUpload {
        batch: ImageBatch::new(images)?,
        farm_id,
        notes,
    })
}

async fn read_image(
    mut field: Field<'_>,
    index: usize,
    max_size: u64,
) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read image {index}: {e}")))?
    {
        if (data.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::Validation(format!(
                "Image {index} exceeds maximum size of {max_size} bytes"
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))
}

fn parse_farm_id(raw: &str) -> Result<Option<Uuid>, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    Uuid::parse_str(raw)
        .map(Some)
        .map_err(|_| AppError::Validation("Invalid farm ID".into()))
}
