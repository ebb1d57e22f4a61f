use sea_orm::DbErr;

/// Errors raised by the record stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row with the requested id. Carries the entity name for messages.
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    /// A stored JSON column no longer matches the current shape.
    #[error("corrupt {entity} {id}: {reason}")]
    Corrupt {
        entity: &'static str,
        id: uuid::Uuid,
        reason: String,
    },
}
