use serde::{Deserialize, Serialize};

use crate::OverallStatus;

/// Class label written for every image when the classifier could not be reached.
pub const UNAVAILABLE_CLASS: &str = "ML_SERVICE_UNAVAILABLE";

/// Substring that marks a class label as healthy (matched case-insensitively).
const HEALTHY_MARKER: &str = "healthy";

/// One entry of the classifier's ranked class list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ClassConfidence {
    /// Class label, e.g. `Tomato___Late_blight`.
    #[serde(rename = "class")]
    #[schema(example = "Tomato___Late_blight")]
    pub class_name: String,
    #[schema(example = 0.82)]
    pub confidence: f64,
}

/// Classifier output for a single image of a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImagePrediction {
    /// Position of the image within its batch.
    #[schema(example = 0)]
    pub image_index: u32,
    #[schema(example = "Tomato___healthy")]
    pub predicted_class: String,
    /// Confidence of `predicted_class`, in `[0, 1]`.
    #[schema(example = 0.97)]
    pub confidence: f64,
    /// Ranked class/confidence list as returned by the classifier.
    #[serde(default)]
    pub all_predictions: Vec<ClassConfidence>,
}

impl ImagePrediction {
    /// Placeholder entry used when the classifier is unavailable.
    pub fn unavailable(image_index: u32) -> Self {
        Self {
            image_index,
            predicted_class: UNAVAILABLE_CLASS.to_string(),
            confidence: 0.0,
            all_predictions: Vec::new(),
        }
    }

    /// Whether the predicted class names a healthy plant.
    ///
    /// Anything else counts as diseased, including [`UNAVAILABLE_CLASS`].
    pub fn is_healthy(&self) -> bool {
        self.predicted_class
            .to_lowercase()
            .contains(HEALTHY_MARKER)
    }
}

/// Derived health statistics of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub healthy_count: u32,
    pub diseased_count: u32,
    pub overall_status: OverallStatus,
}

impl Default for StatusSummary {
    fn default() -> Self {
        Self {
            healthy_count: 0,
            diseased_count: 0,
            overall_status: OverallStatus::Mixed,
        }
    }
}

impl StatusSummary {
    /// Classify a batch of predictions.
    ///
    /// Returns `None` for an empty batch: there is nothing to derive from, and
    /// callers keep whatever summary they already hold.
    pub fn from_predictions(predictions: &[ImagePrediction]) -> Option<Self> {
        if predictions.is_empty() {
            return None;
        }

        let total = predictions.len() as u32;
        let healthy_count = predictions.iter().filter(|p| p.is_healthy()).count() as u32;
        let diseased_count = total - healthy_count;

        let overall_status = if healthy_count == total {
            OverallStatus::Healthy
        } else if diseased_count == total {
            OverallStatus::Diseased
        } else {
            OverallStatus::Mixed
        };

        Some(Self {
            healthy_count,
            diseased_count,
            overall_status,
        })
    }

    /// Recompute in place from `predictions`; an empty slice leaves `self` untouched.
    pub fn refresh(&mut self, predictions: &[ImagePrediction]) {
        if let Some(summary) = Self::from_predictions(predictions) {
            *self = summary;
        }
    }
}
