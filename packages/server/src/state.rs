use std::sync::Arc;

use leafwatch_common::storage::ImageStore;

use crate::config::AppConfig;
use crate::gateway::InferenceGateway;
use crate::intake::UploadLimits;
use crate::store::{FarmStore, FarmerDirectory, PredictionStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub predictions: Arc<dyn PredictionStore>,
    pub farms: Arc<dyn FarmStore>,
    pub farmers: Arc<dyn FarmerDirectory>,
    pub images: Arc<dyn ImageStore>,
    pub gateway: InferenceGateway,
}

impl AppState {
    /// State backed by one store implementing every record trait.
    pub fn new<S>(
        config: AppConfig,
        store: Arc<S>,
        images: Arc<dyn ImageStore>,
        gateway: InferenceGateway,
    ) -> Self
    where
        S: PredictionStore + FarmStore + FarmerDirectory + 'static,
    {
        Self {
            config: Arc::new(config),
            predictions: store.clone(),
            farms: store.clone(),
            farmers: store,
            images,
            gateway,
        }
    }

    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_images: self.config.prediction.max_images,
            max_image_size: self.config.storage.max_image_size,
        }
    }
}
