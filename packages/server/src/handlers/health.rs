use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    /// Whether the classification service answered its health check.
    pub classifier_available: bool,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "health",
    summary = "Service liveness",
    description = "Always 200 while the service runs. Predictions still succeed when \
        `classifierAvailable` is false; they are recorded with fallback results.",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        classifier_available: state.gateway.health_check().await,
    })
}
