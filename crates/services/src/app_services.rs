use std::sync::Arc;

use pathwise_core::model::DisplaySettings;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::gateway::{Gateway, StorageGateway};
use crate::learner_service::LearnerService;
use crate::views::ViewLoader;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    learners: Arc<LearnerService>,
    views: Arc<ViewLoader>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: DisplaySettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, settings))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, settings: DisplaySettings) -> Self {
        let gateway: Arc<dyn Gateway> = Arc::new(StorageGateway::new(storage));
        Self {
            learners: Arc::new(LearnerService::from_storage(clock, storage)),
            views: Arc::new(ViewLoader::new(gateway, settings)),
        }
    }

    #[must_use]
    pub fn learners(&self) -> Arc<LearnerService> {
        Arc::clone(&self.learners)
    }

    #[must_use]
    pub fn views(&self) -> Arc<ViewLoader> {
        Arc::clone(&self.views)
    }
}
