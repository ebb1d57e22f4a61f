#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Derived health label of a prediction batch.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    /// Every image in the batch was classified as healthy.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "healthy"))]
    Healthy,
    /// No image in the batch was classified as healthy.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "diseased"))]
    Diseased,
    /// Some images healthy, some not. Also the value of a batch whose status
    /// was never derived.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "mixed"))]
    Mixed,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Diseased => "diseased",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for OverallStatus {
    fn default() -> Self {
        Self::Mixed
    }
}
