use std::collections::BTreeSet;
use std::sync::Arc;

use pathwise_core::model::{
    DisplaySettings, LearnerId, LearningPath, ResourceCatalog, ResourceId,
};

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::views::analytics::Analytics;
use crate::views::path_overview::PathOverview;
use crate::views::progress_dashboard::ProgressDashboard;
use crate::views::state::{ViewError, ViewState};

/// Fetches snapshots through a `Gateway` and hands them to the view builders.
#[derive(Clone)]
pub struct ViewLoader {
    gateway: Arc<dyn Gateway>,
    settings: DisplaySettings,
}

impl ViewLoader {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, settings: DisplaySettings) -> Self {
        Self { gateway, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub async fn load_path_overview(&self, learner_id: LearnerId) -> ViewState<PathOverview> {
        let mut state = ViewState::Idle;
        state.begin();
        let outcome = self.path_overview(learner_id).await;
        state.resolve(outcome.map_err(|e| view_error("path overview", &e)));
        state
    }

    pub async fn load_progress_dashboard(
        &self,
        learner_id: LearnerId,
    ) -> ViewState<ProgressDashboard> {
        let mut state = ViewState::Idle;
        state.begin();
        let outcome = self.progress_dashboard(learner_id).await;
        state.resolve(outcome.map_err(|e| view_error("progress dashboard", &e)));
        state
    }

    pub async fn load_analytics(&self) -> ViewState<Analytics> {
        let mut state = ViewState::Idle;
        state.begin();
        let outcome = self.analytics().await;
        state.resolve(outcome.map_err(|e| view_error("analytics", &e)));
        state
    }

    async fn path_overview(&self, learner_id: LearnerId) -> Result<PathOverview, GatewayError> {
        self.gateway.fetch_learner(learner_id).await?;
        let path = self.optional_path(learner_id).await?;
        let ids = path
            .as_ref()
            .map(|p| p.resource_ids().to_vec())
            .unwrap_or_default();
        let catalog = self.catalog_for(ids).await?;
        Ok(PathOverview::build(path.as_ref(), &catalog))
    }

    async fn progress_dashboard(
        &self,
        learner_id: LearnerId,
    ) -> Result<ProgressDashboard, GatewayError> {
        let learner = self.gateway.fetch_learner(learner_id).await?;
        let path = self.optional_path(learner_id).await?;
        let results = self.gateway.fetch_quiz_results(learner_id).await?;
        let catalog = self
            .catalog_for(results.iter().map(|r| r.resource_id().clone()))
            .await?;
        Ok(ProgressDashboard::build(
            &learner,
            path.as_ref(),
            &results,
            &catalog,
            &self.settings,
        ))
    }

    async fn analytics(&self) -> Result<Analytics, GatewayError> {
        let learners = self.gateway.fetch_all_learners().await?;
        let paths = self.gateway.fetch_all_paths().await?;
        let total_results = self.gateway.count_quiz_results().await?;
        Ok(Analytics::build(&learners, &paths, total_results))
    }

    async fn optional_path(
        &self,
        learner_id: LearnerId,
    ) -> Result<Option<LearningPath>, GatewayError> {
        match self.gateway.fetch_learning_path(learner_id).await {
            Ok(path) => Ok(Some(path)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Catalog entries for the given ids. Unknown ids are left out.
    async fn catalog_for(
        &self,
        ids: impl IntoIterator<Item = ResourceId>,
    ) -> Result<ResourceCatalog, GatewayError> {
        let wanted: BTreeSet<ResourceId> = ids.into_iter().collect();
        let mut catalog = ResourceCatalog::new();
        for id in wanted {
            match self.gateway.fetch_resource_catalog_entry(&id).await {
                Ok(resource) => catalog.insert(resource),
                Err(err) if err.is_not_found() => {
                    tracing::debug!(resource_id = %id, "resource missing from catalog");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(catalog)
    }
}

fn view_error(view: &'static str, err: &GatewayError) -> ViewError {
    let mapped = ViewError::from(err);
    match mapped {
        ViewError::NotFound => tracing::debug!(view, error = %err, "view subject not found"),
        ViewError::Unavailable => tracing::warn!(view, error = %err, "view load failed"),
    }
    mapped
}
