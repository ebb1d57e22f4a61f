pub mod admin;
pub mod farm;
pub mod health;
pub mod prediction;
