use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::StoreError;
use super::types::{
    Farm, FarmChanges, Farmer, FarmerProfile, NewFarm, NewPredictionRecord, OwnerCount,
    PredictionRecord, StatusCounts,
};

/// Storage for prediction records.
#[async_trait]
pub trait PredictionStore: Send + Sync {
    /// Persist a new record. The status summary is derived here, from the
    /// predictions, regardless of backend.
    async fn create(&self, new: NewPredictionRecord) -> Result<PredictionRecord, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<PredictionRecord>, StoreError>;

    /// Records of one owner, newest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<PredictionRecord>, StoreError>;

    /// Remove a record. `StoreError::NotFound` if it does not exist.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Most recent records across all owners.
    async fn list_recent(&self, limit: u64) -> Result<Vec<PredictionRecord>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    async fn count_by_status(&self) -> Result<StatusCounts, StoreError>;

    /// Owners with the most records, highest first.
    async fn top_owners(&self, limit: u64) -> Result<Vec<OwnerCount>, StoreError>;
}

#[async_trait]
pub trait FarmStore: Send + Sync {
    async fn create(&self, new: NewFarm) -> Result<Farm, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Farm>, StoreError>;

    /// Farms of one farmer, newest first.
    async fn list_by_owner(&self, farmer_id: Uuid) -> Result<Vec<Farm>, StoreError>;

    async fn update(&self, id: Uuid, changes: FarmChanges) -> Result<Farm, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}

/// Farmer profiles seen in verified tokens.
#[async_trait]
pub trait FarmerDirectory: Send + Sync {
    /// Insert the farmer, or refresh name and email if already known.
    /// `created_at` is kept from the first sighting.
    async fn upsert(&self, profile: FarmerProfile) -> Result<Farmer, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Farmer>, StoreError>;

    /// All farmers, newest first.
    async fn list(&self) -> Result<Vec<Farmer>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// Farmers first seen at or after `since`.
    async fn count_since(&self, since: DateTime<Utc>) -> Result<u64, StoreError>;
}
