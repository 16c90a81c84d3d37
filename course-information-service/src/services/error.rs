use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Failed to load catalog snapshot {path}: {source}")]
    Snapshot {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            CatalogError::Snapshot { path, source } => {
                AppError::InternalError(source.context(format!("catalog snapshot {}", path)))
            }
            CatalogError::Internal(e) => AppError::InternalError(e),
        }
    }
}
