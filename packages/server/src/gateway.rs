//! Client side of the external classification service.
//!
//! [`InferenceGateway::classify`] never fails: whenever the classifier cannot
//! produce a usable answer in time, every image gets a fallback prediction.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use leafwatch_common::ImagePrediction;
use leafwatch_common::inference::{
    InferenceImage, InferenceRequest, InferenceResponse, ResponseError, fallback_predictions,
};
use reqwest::StatusCode;
use tracing::{instrument, warn};

use crate::config::InferenceConfig;

/// Reasons a classifier call produced no usable predictions.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("classifier did not answer within {0:?}")]
    Timeout(Duration),
    #[error("classifier unreachable: {0}")]
    Transport(reqwest::Error),
    #[error("classifier returned HTTP {0}")]
    Status(StatusCode),
    #[error("classifier response could not be decoded: {0}")]
    Decode(reqwest::Error),
    #[error("classifier response does not match the batch: {0}")]
    Mismatch(#[from] ResponseError),
}

/// A service that labels stored images.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, request: &InferenceRequest)
    -> Result<InferenceResponse, GatewayError>;

    /// Whether the service currently answers its health check.
    async fn health_check(&self) -> bool;
}

/// Classifier reached over HTTP: `POST {base}/predict`, `GET {base}/health`.
pub struct HttpClassifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClassifier {
    pub fn new(config: &InferenceConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn transport(err: reqwest::Error, timeout: Option<Duration>) -> GatewayError {
    match timeout {
        Some(limit) if err.is_timeout() => GatewayError::Timeout(limit),
        _ => GatewayError::Transport(err),
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(
        &self,
        request: &InferenceRequest,
    ) -> Result<InferenceResponse, GatewayError> {
        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| transport(e, None))?;

        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status()));
        }

        response
            .json::<InferenceResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Transport(e)
                } else {
                    GatewayError::Decode(e)
                }
            })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Upper bound for a classifier health check, independent of the inference timeout.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Bounded, infallible access to a [`Classifier`].
#[derive(Clone)]
pub struct InferenceGateway {
    classifier: Arc<dyn Classifier>,
    timeout: Duration,
}

impl InferenceGateway {
    pub fn new(classifier: Arc<dyn Classifier>, timeout: Duration) -> Self {
        Self {
            classifier,
            timeout,
        }
    }

    /// Gateway to the HTTP classifier described by `config`.
    pub fn http(config: &InferenceConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            Arc::new(HttpClassifier::new(config)?),
            Duration::from_secs(config.timeout_secs),
        ))
    }

    /// One prediction per image, in image order.
    ///
    /// Falls back to [`ImagePrediction::unavailable`] entries on any failure.
    #[instrument(skip(self, images), fields(count = images.len()))]
    pub async fn classify(&self, images: &[InferenceImage]) -> Vec<ImagePrediction> {
        match self.try_classify(images).await {
            Ok(predictions) => predictions,
            Err(e) => {
                warn!(error = %e, "Classifier unavailable, using fallback predictions");
                fallback_predictions(images.len())
            }
        }
    }

    async fn try_classify(
        &self,
        images: &[InferenceImage],
    ) -> Result<Vec<ImagePrediction>, GatewayError> {
        let request = InferenceRequest {
            images: images.to_vec(),
        };
        let response = tokio::time::timeout(self.timeout, self.classifier.classify(&request))
            .await
            .map_err(|_| GatewayError::Timeout(self.timeout))?
            .map_err(|e| match e {
                GatewayError::Transport(inner) => transport(inner, Some(self.timeout)),
                other => other,
            })?;
        Ok(response.into_ordered(images.len())?)
    }

    /// Whether the classifier answers its health check within
    /// [`HEALTH_CHECK_TIMEOUT`] (or the inference timeout, if shorter).
    pub async fn health_check(&self) -> bool {
        let limit = self.timeout.min(HEALTH_CHECK_TIMEOUT);
        tokio::time::timeout(limit, self.classifier.health_check())
            .await
            .unwrap_or(false)
    }
}
