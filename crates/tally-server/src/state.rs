use tally_core::TokenConfig;
use tally_db::Database;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub db: Database,
    /// JWT signing configuration for access and refresh tokens.
    pub tokens: TokenConfig,
}
