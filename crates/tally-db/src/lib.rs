pub mod category_repository;
pub mod config;
pub mod database;
pub mod product_repository;
pub mod user_repository;

pub use category_repository::CategoryRepository;
pub use config::DatabaseConfig;
pub use database::Database;
pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;

use tally_core::AppError;

/// Map sqlx failures onto domain errors. Unique and foreign-key violations
/// become conflicts so handlers can answer 409 even when a pre-check raced.
pub(crate) fn map_sqlx_err(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() || db.is_foreign_key_violation() {
            return AppError::Conflict(db.message().to_string());
        }
    }
    AppError::DatabaseError(e.to_string())
}
