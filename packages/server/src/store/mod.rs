//! Persistence for prediction records, farms and farmer profiles.
//!
//! Handlers only see the traits in [`traits`]. [`database::DatabaseStore`] is
//! backed by PostgreSQL; [`memory::MemoryStore`] keeps everything in process
//! and is used when no database URL is configured.

mod error;
mod traits;
mod types;

pub mod database;
pub mod memory;

pub use error::StoreError;
pub use traits::{FarmStore, FarmerDirectory, PredictionStore};
pub use types::{
    AreaUnit, Farm, FarmChanges, Farmer, FarmerProfile, ImageRef, IrrigationType, NewFarm,
    NewPredictionRecord, OwnerCount, PredictionRecord, StatusCounts,
};
