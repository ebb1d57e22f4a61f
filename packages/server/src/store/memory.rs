use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use super::error::StoreError;
use super::traits::{FarmStore, FarmerDirectory, PredictionStore};
use super::types::{
    Farm, FarmChanges, Farmer, FarmerProfile, NewFarm, NewPredictionRecord, OwnerCount,
    PredictionRecord, StatusCounts, rank_owners,
};

/// In-process store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    predictions: DashMap<Uuid, PredictionRecord>,
    farms: DashMap<Uuid, Farm>,
    farmers: DashMap<Uuid, Farmer>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first; UUIDv7 ids break timestamp ties in creation order.
fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, Uuid)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl PredictionStore for MemoryStore {
    async fn create(&self, new: NewPredictionRecord) -> Result<PredictionRecord, StoreError> {
        let record = new.into_record(Utc::now());
        self.predictions.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<PredictionRecord>, StoreError> {
        Ok(self.predictions.get(&id).map(|r| r.value().clone()))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<PredictionRecord>, StoreError> {
        let mut records: Vec<PredictionRecord> = self
            .predictions
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .map(|r| r.value().clone())
            .collect();
        newest_first(&mut records, |r| (r.created_at, r.id));
        Ok(records)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.predictions
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("Prediction"))
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<PredictionRecord>, StoreError> {
        let mut records: Vec<PredictionRecord> =
            self.predictions.iter().map(|r| r.value().clone()).collect();
        newest_first(&mut records, |r| (r.created_at, r.id));
        records.truncate(limit as usize);
        Ok(records)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.predictions.len() as u64)
    }

    async fn count_by_status(&self) -> Result<StatusCounts, StoreError> {
        Ok(StatusCounts::tally(
            self.predictions.iter().map(|r| r.summary.overall_status),
        ))
    }

    async fn top_owners(&self, limit: u64) -> Result<Vec<OwnerCount>, StoreError> {
        Ok(rank_owners(
            self.predictions.iter().map(|r| r.owner_id),
            limit,
        ))
    }
}

#[async_trait]
impl FarmStore for MemoryStore {
    async fn create(&self, new: NewFarm) -> Result<Farm, StoreError> {
        let farm = new.into_farm(Utc::now());
        self.farms.insert(farm.id, farm.clone());
        Ok(farm)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Farm>, StoreError> {
        Ok(self.farms.get(&id).map(|f| f.value().clone()))
    }

    async fn list_by_owner(&self, farmer_id: Uuid) -> Result<Vec<Farm>, StoreError> {
        let mut farms: Vec<Farm> = self
            .farms
            .iter()
            .filter(|f| f.farmer_id == farmer_id)
            .map(|f| f.value().clone())
            .collect();
        newest_first(&mut farms, |f| (f.created_at, f.id));
        Ok(farms)
    }

    async fn update(&self, id: Uuid, changes: FarmChanges) -> Result<Farm, StoreError> {
        let mut farm = self
            .farms
            .get_mut(&id)
            .ok_or(StoreError::NotFound("Farm"))?;
        changes.apply(farm.value_mut(), Utc::now());
        Ok(farm.value().clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.farms
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("Farm"))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.farms.len() as u64)
    }
}

#[async_trait]
impl FarmerDirectory for MemoryStore {
    async fn upsert(&self, profile: FarmerProfile) -> Result<Farmer, StoreError> {
        let now = Utc::now();
        let farmer = self
            .farmers
            .entry(profile.id)
            .and_modify(|f| {
                f.name = profile.name.clone();
                f.email = profile.email.clone();
                f.updated_at = now;
            })
            .or_insert_with(|| Farmer {
                id: profile.id,
                name: profile.name.clone(),
                email: profile.email.clone(),
                created_at: now,
                updated_at: now,
            })
            .value()
            .clone();
        Ok(farmer)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Farmer>, StoreError> {
        Ok(self.farmers.get(&id).map(|f| f.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Farmer>, StoreError> {
        let mut farmers: Vec<Farmer> = self.farmers.iter().map(|f| f.value().clone()).collect();
        newest_first(&mut farmers, |f| (f.created_at, f.id));
        Ok(farmers)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.farmers.len() as u64)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> Result<u64, StoreError> {
        Ok(self
            .farmers
            .iter()
            .filter(|f| f.created_at >= since)
            .count() as u64)
    }
}
