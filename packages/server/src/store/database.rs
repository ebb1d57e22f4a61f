use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leafwatch_common::{OverallStatus, StatusSummary};
use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::error::StoreError;
use super::traits::{FarmStore, FarmerDirectory, PredictionStore};
use super::types::{
    Farm, FarmChanges, Farmer, FarmerProfile, NewFarm, NewPredictionRecord, OwnerCount,
    PredictionRecord, StatusCounts,
};
use crate::entity::{farm, farmer, prediction};

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct DatabaseStore {
    db: DatabaseConnection,
}

impl DatabaseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn corrupt(entity: &'static str, id: Uuid) -> impl FnOnce(serde_json::Error) -> StoreError {
    move |e| StoreError::Corrupt {
        entity,
        id,
        reason: e.to_string(),
    }
}

/// `COUNT(prediction.id)`, for grouped aggregates.
fn record_count() -> Expr {
    Func::count(Expr::col(prediction::Column::Id)).into()
}

fn record_from_model(model: prediction::Model) -> Result<PredictionRecord, StoreError> {
    Ok(PredictionRecord {
        id: model.id,
        owner_id: model.owner_id,
        farm_id: model.farm_id,
        images: serde_json::from_value(model.images).map_err(corrupt("prediction", model.id))?,
        predictions: serde_json::from_value(model.predictions)
            .map_err(corrupt("prediction", model.id))?,
        summary: StatusSummary {
            healthy_count: model.healthy_count.max(0) as u32,
            diseased_count: model.diseased_count.max(0) as u32,
            overall_status: model.overall_status,
        },
        notes: model.notes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn active_from_record(record: &PredictionRecord) -> Result<prediction::ActiveModel, StoreError> {
    Ok(prediction::ActiveModel {
        id: Set(record.id),
        owner_id: Set(record.owner_id),
        farm_id: Set(record.farm_id),
        images: Set(serde_json::to_value(&record.images).map_err(corrupt("prediction", record.id))?),
        predictions: Set(serde_json::to_value(&record.predictions)
            .map_err(corrupt("prediction", record.id))?),
        overall_status: Set(record.summary.overall_status),
        healthy_count: Set(record.summary.healthy_count as i32),
        diseased_count: Set(record.summary.diseased_count as i32),
        notes: Set(record.notes.clone()),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
    })
}

impl From<farm::Model> for Farm {
    fn from(m: farm::Model) -> Self {
        Self {
            id: m.id,
            farmer_id: m.farmer_id,
            farm_name: m.farm_name,
            location: m.location,
            area: m.area,
            area_unit: m.area_unit,
            crop_type: m.crop_type,
            soil_type: m.soil_type,
            irrigation_type: m.irrigation_type,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<Farm> for farm::ActiveModel {
    fn from(f: Farm) -> Self {
        Self {
            id: Set(f.id),
            farmer_id: Set(f.farmer_id),
            farm_name: Set(f.farm_name),
            location: Set(f.location),
            area: Set(f.area),
            area_unit: Set(f.area_unit),
            crop_type: Set(f.crop_type),
            soil_type: Set(f.soil_type),
            irrigation_type: Set(f.irrigation_type),
            description: Set(f.description),
            created_at: Set(f.created_at),
            updated_at: Set(f.updated_at),
        }
    }
}

impl From<farmer::Model> for Farmer {
    fn from(m: farmer::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[async_trait]
impl PredictionStore for DatabaseStore {
    async fn create(&self, new: NewPredictionRecord) -> Result<PredictionRecord, StoreError> {
        let record = new.into_record(Utc::now());
        let saved = active_from_record(&record)?.insert(&self.db).await?;
        record_from_model(saved)
    }

    async fn get(&self, id: Uuid) -> Result<Option<PredictionRecord>, StoreError> {
        prediction::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(record_from_model)
            .transpose()
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<PredictionRecord>, StoreError> {
        prediction::Entity::find()
            .filter(prediction::Column::OwnerId.eq(owner_id))
            .order_by_desc(prediction::Column::CreatedAt)
            .order_by_desc(prediction::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(record_from_model)
            .collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = prediction::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("Prediction"));
        }
        Ok(())
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<PredictionRecord>, StoreError> {
        prediction::Entity::find()
            .order_by_desc(prediction::Column::CreatedAt)
            .order_by_desc(prediction::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(record_from_model)
            .collect()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(prediction::Entity::find().count(&self.db).await?)
    }

    async fn count_by_status(&self) -> Result<StatusCounts, StoreError> {
        let groups: Vec<(OverallStatus, i64)> = prediction::Entity::find()
            .select_only()
            .column(prediction::Column::OverallStatus)
            .column_as(record_count(), "total")
            .group_by(prediction::Column::OverallStatus)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut counts = StatusCounts::default();
        for (status, total) in groups {
            counts.add(status, u64::try_from(total).unwrap_or_default());
        }
        Ok(counts)
    }

    async fn top_owners(&self, limit: u64) -> Result<Vec<OwnerCount>, StoreError> {
        let ranked: Vec<(Uuid, i64)> = prediction::Entity::find()
            .select_only()
            .column(prediction::Column::OwnerId)
            .column_as(record_count(), "total")
            .group_by(prediction::Column::OwnerId)
            .order_by_desc(record_count())
            .order_by_asc(prediction::Column::OwnerId)
            .limit(limit)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(ranked
            .into_iter()
            .map(|(owner_id, total)| OwnerCount {
                owner_id,
                count: u64::try_from(total).unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl FarmStore for DatabaseStore {
    async fn create(&self, new: NewFarm) -> Result<Farm, StoreError> {
        let model = farm::ActiveModel::from(new.into_farm(Utc::now()))
            .insert(&self.db)
            .await?;
        Ok(model.into())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Farm>, StoreError> {
        Ok(farm::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Farm::from))
    }

    async fn list_by_owner(&self, farmer_id: Uuid) -> Result<Vec<Farm>, StoreError> {
        Ok(farm::Entity::find()
            .filter(farm::Column::FarmerId.eq(farmer_id))
            .order_by_desc(farm::Column::CreatedAt)
            .order_by_desc(farm::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Farm::from)
            .collect())
    }

    async fn update(&self, id: Uuid, changes: FarmChanges) -> Result<Farm, StoreError> {
        let mut current: Farm = farm::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("Farm"))?
            .into();
        changes.apply(&mut current, Utc::now());

        let model = farm::ActiveModel::from(current).update(&self.db).await?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = farm::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("Farm"));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(farm::Entity::find().count(&self.db).await?)
    }
}

#[async_trait]
impl FarmerDirectory for DatabaseStore {
    async fn upsert(&self, profile: FarmerProfile) -> Result<Farmer, StoreError> {
        let now = Utc::now();
        let model = farmer::ActiveModel {
            id: Set(profile.id),
            name: Set(profile.name),
            email: Set(profile.email),
            created_at: Set(now),
            updated_at: Set(now),
        };

        farmer::Entity::insert(model)
            .on_conflict(
                OnConflict::column(farmer::Column::Id)
                    .update_columns([
                        farmer::Column::Name,
                        farmer::Column::Email,
                        farmer::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        farmer::Entity::find_by_id(profile.id)
            .one(&self.db)
            .await?
            .map(Farmer::from)
            .ok_or(StoreError::NotFound("Farmer"))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Farmer>, StoreError> {
        Ok(farmer::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Farmer::from))
    }

    async fn list(&self) -> Result<Vec<Farmer>, StoreError> {
        Ok(farmer::Entity::find()
            .order_by_desc(farmer::Column::CreatedAt)
            .order_by_desc(farmer::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Farmer::from)
            .collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(farmer::Entity::find().count(&self.db).await?)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> Result<u64, StoreError> {
        Ok(farmer::Entity::find()
            .filter(farmer::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await?)
    }
}
