use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::{farm, prediction};

/// Ensure the listing indexes exist.
///
/// Schema sync only creates single-column indexes, so the composite ones
/// are created here on startup. Failures are logged and skipped.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Per-owner history, newest first.
    create_index(
        db,
        "idx_prediction_owner_created",
        Index::create()
            .table(prediction::Entity)
            .col(prediction::Column::OwnerId)
            .col(prediction::Column::CreatedAt)
            .to_owned(),
    )
    .await;

    // Admin dashboard: most recent records across everyone.
    create_index(
        db,
        "idx_prediction_created",
        Index::create()
            .table(prediction::Entity)
            .col(prediction::Column::CreatedAt)
            .to_owned(),
    )
    .await;

    create_index(
        db,
        "idx_farm_farmer_created",
        Index::create()
            .table(farm::Entity)
            .col(farm::Column::FarmerId)
            .col(farm::Column::CreatedAt)
            .to_owned(),
    )
    .await;

    Ok(())
}

async fn create_index(db: &DatabaseConnection, name: &str, mut stmt: IndexCreateStatement) {
    let sql = stmt
        .if_not_exists()
        .name(name)
        .to_string(PostgresQueryBuilder);
    match db.execute_unprepared(&sql).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => warn!("Failed to create index {}: {}", name, e),
    }
}
