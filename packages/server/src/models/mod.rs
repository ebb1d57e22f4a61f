pub mod admin;
pub mod farm;
pub mod prediction;
pub mod shared;
