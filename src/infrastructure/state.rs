//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::AuthKeys;
use crate::domain::{PdfRepository, SubtopicRepository, UnitRepository};
use crate::infrastructure::{
    SeaOrmPdfRepository, SeaOrmSubtopicRepository, SeaOrmUnitRepository,
};
use crate::storage::ObjectStorage;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    /// Token keys, built once from the process configuration
    pub auth: AuthKeys,
    /// Object storage adapter for uploaded binaries
    pub storage: Arc<dyn ObjectStorage>,
    /// Unit repository
    pub unit_repo: Arc<dyn UnitRepository>,
    /// Subtopic repository
    pub subtopic_repo: Arc<dyn SubtopicRepository>,
    /// PDF repository
    pub pdf_repo: Arc<dyn PdfRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(
        db: DatabaseConnection,
        auth: AuthKeys,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        let unit_repo = Arc::new(SeaOrmUnitRepository::new(db.clone()));
        let subtopic_repo = Arc::new(SeaOrmSubtopicRepository::new(db.clone()));
        let pdf_repo = Arc::new(SeaOrmPdfRepository::new(db.clone()));

        Self {
            db,
            auth,
            storage,
            unit_repo,
            subtopic_repo,
            pdf_repo,
        }
    }

    /// Get the database connection (used by the auth handlers)
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Allow the AuthUser extractor to reach the token keys
impl axum::extract::FromRef<AppState> for AuthKeys {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
