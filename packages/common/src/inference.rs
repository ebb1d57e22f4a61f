//! Wire format of the external classification service.
//!
//! `POST /predict` takes an [`InferenceRequest`] and answers with an
//! [`InferenceResponse`]. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::prediction::ImagePrediction;

/// A stored image the classifier should read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceImage {
    pub filename: String,
    /// Absolute path on storage shared with the classifier.
    pub path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub images: Vec<InferenceImage>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub predictions: Vec<ImagePrediction>,
}

/// A classifier answer that cannot be matched to the submitted batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResponseError {
    #[error("expected {expected} predictions, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("image index {0} is out of range or duplicated")]
    BadIndex(u32),
    #[error("confidence {confidence} for image {index} is outside [0, 1]")]
    ConfidenceOutOfRange { index: u32, confidence: f64 },
}

impl InferenceResponse {
    /// Check the answer against a batch of `expected` images and return the
    /// predictions ordered by image index.
    pub fn into_ordered(self, expected: usize) -> Result<Vec<ImagePrediction>, ResponseError> {
        if self.predictions.len() != expected {
            return Err(ResponseError::CountMismatch {
                expected,
                actual: self.predictions.len(),
            });
        }

        let mut slots: Vec<Option<ImagePrediction>> = vec![None; expected];
        for prediction in self.predictions {
            let index = prediction.image_index;
            if !(0.0..=1.0).contains(&prediction.confidence) {
                return Err(ResponseError::ConfidenceOutOfRange {
                    index,
                    confidence: prediction.confidence,
                });
            }
            match slots.get_mut(index as usize) {
                Some(slot @ None) => *slot = Some(prediction),
                _ => return Err(ResponseError::BadIndex(index)),
            }
        }

        // Every slot is filled: the count matched and no index repeated.
        Ok(slots.into_iter().flatten().collect())
    }
}

/// One placeholder prediction per image, in batch order.
pub fn fallback_predictions(count: usize) -> Vec<ImagePrediction> {
    (0..count as u32).map(ImagePrediction::unavailable).collect()
}
