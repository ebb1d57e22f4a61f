pub mod farm;
pub mod farmer;
pub mod prediction;
