use serde::Serialize;

use pathwise_core::NotFound;
use pathwise_core::model::{LearningPath, Resource, ResourceCatalog, ResourceId, ResourceKind};
use pathwise_core::progress::{
    ResourceState, completed_count, completion_percentage, remaining_count,
    resolve_current_resource, resource_state,
};

/// The resource a learner should work on next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentResource {
    pub id: ResourceId,
    pub title: String,
    pub kind: ResourceKind,
    pub topic: String,
    pub difficulty: u8,
    pub content_url: Option<String>,
}

impl From<&Resource> for CurrentResource {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id.clone(),
            title: resource.title.clone(),
            kind: resource.kind,
            topic: resource.topic.clone(),
            difficulty: resource.difficulty.value(),
            content_url: resource.content_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathEntry {
    pub index: usize,
    pub resource_id: ResourceId,
    /// Absent when the catalog has no entry for the id.
    pub title: Option<String>,
    pub state: ResourceState,
}

/// Display-ready learning path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathOverview {
    pub completion_percentage: f64,
    pub completed_count: usize,
    pub total_count: usize,
    pub remaining_count: usize,
    pub current_resource: Option<CurrentResource>,
    pub current_resource_missing: bool,
    pub entries: Vec<PathEntry>,
}

/// The first entries of a path plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathPreview<'a> {
    pub entries: &'a [PathEntry],
    pub hidden: usize,
}

impl PathPreview<'_> {
    /// "And N more resources..." when entries were hidden.
    #[must_use]
    pub fn more_label(&self) -> Option<String> {
        (self.hidden > 0).then(|| format!("And {} more resources...", self.hidden))
    }
}

impl PathOverview {
    /// Overview for a learner without a path.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the overview. `None` yields the empty overview.
    #[must_use]
    pub fn build(path: Option<&LearningPath>, catalog: &ResourceCatalog) -> Self {
        let Some(path) = path else {
            return Self::empty();
        };
        if let Some(warning) = path.integrity_warning() {
            warning.log();
        }

        let (current_resource, current_resource_missing) =
            match resolve_current_resource(path, catalog) {
                Ok(resource) => (resource.map(CurrentResource::from), false),
                Err(NotFound::MissingFromCatalog(id)) => {
                    tracing::warn!(path_id = %path.id(), resource_id = %id, "path references unknown resource");
                    (None, true)
                }
                Err(_) => (None, false),
            };

        let entries = path
            .resource_ids()
            .iter()
            .enumerate()
            .map(|(index, id)| PathEntry {
                index,
                resource_id: id.clone(),
                title: catalog.get(id).map(|r| r.title.clone()),
                state: resource_state(path, index),
            })
            .collect();

        Self {
            completion_percentage: completion_percentage(path),
            completed_count: completed_count(path),
            total_count: path.len(),
            remaining_count: remaining_count(path),
            current_resource,
            current_resource_missing,
            entries,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_count > 0 && self.remaining_count == 0
    }

    #[must_use]
    pub fn preview(&self, limit: usize) -> PathPreview<'_> {
        let shown = limit.min(self.entries.len());
        PathPreview {
            entries: &self.entries[..shown],
            hidden: self.entries.len() - shown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::capture::warn_lines;
    use pathwise_core::model::{Difficulty, LearnerId, PathId, StyleAffinity};
    use pathwise_core::time::fixed_now;

    fn rid(raw: &str) -> ResourceId {
        ResourceId::new(raw).unwrap()
    }

    fn catalog(ids: &[&str]) -> ResourceCatalog {
        ids.iter()
            .map(|id| {
                Resource::new(
                    rid(id),
                    format!("Title {id}"),
                    ResourceKind::Video,
                    "variables",
                    Difficulty::new(1).unwrap(),
                    StyleAffinity::Universal,
                )
                .unwrap()
            })
            .collect()
    }

    fn path(ids: &[&str], position: usize) -> LearningPath {
        LearningPath::from_persisted(
            PathId::generate(),
            LearnerId::generate(),
            ids.iter().map(|id| rid(id)).collect(),
            position,
            fixed_now(),
            fixed_now(),
        )
    }

    #[test]
    fn missing_path_is_empty() {
        let overview = PathOverview::build(None, &ResourceCatalog::new());
        assert_eq!(overview, PathOverview::empty());
        assert_eq!(overview.completion_percentage, 0.0);
        assert!(overview.current_resource.is_none());
        assert!(!overview.is_complete());
    }

    #[test]
    fn mid_path_overview() {
        let ids = ["a1", "a2", "a3", "a4"];
        let overview = PathOverview::build(Some(&path(&ids, 1)), &catalog(&ids));
        assert_eq!(overview.completion_percentage, 25.0);
        assert_eq!(overview.completed_count, 1);
        assert_eq!(overview.remaining_count, 3);
        assert_eq!(overview.current_resource.as_ref().unwrap().id, rid("a2"));
        let states: Vec<ResourceState> = overview.entries.iter().map(|e| e.state).collect();
        assert_eq!(
            states,
            vec![
                ResourceState::Completed,
                ResourceState::Current,
                ResourceState::Upcoming,
                ResourceState::Upcoming
            ]
        );
    }

    #[test]
    fn finished_path_has_no_current_resource() {
        let ids = ["a1", "a2"];
        let overview = PathOverview::build(Some(&path(&ids, 2)), &catalog(&ids));
        assert!(overview.is_complete());
        assert!(overview.current_resource.is_none());
        assert!(!overview.current_resource_missing);
        assert!(overview.entries.iter().all(|e| e.state == ResourceState::Completed));
    }

    #[test]
    fn dangling_reference_is_flagged() {
        let overview = PathOverview::build(Some(&path(&["a1", "gone"], 1)), &catalog(&["a1"]));
        assert!(overview.current_resource.is_none());
        assert!(overview.current_resource_missing);
        assert_eq!(overview.entries[1].title, None);
        assert_eq!(overview.entries[0].title.as_deref(), Some("Title a1"));
    }

    #[test]
    fn overflowed_cursor_is_clamped() {
        let ids = ["a1", "a2"];
        let overview = PathOverview::build(Some(&path(&ids, 9)), &catalog(&ids));
        assert_eq!(overview.completion_percentage, 100.0);
        assert_eq!(overview.remaining_count, 0);
        assert!(overview.current_resource.is_none());
        assert!(!overview.current_resource_missing);
    }

    #[test]
    fn overflowed_cursor_warns_once_per_build() {
        let ids: Vec<String> = (0..20).map(|i| format!("r{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let corrupt = path(&refs, 25);
        let catalog = catalog(&refs);
        let (overview, warnings) =
            warn_lines(|| PathOverview::build(Some(&corrupt), &catalog));
        assert_eq!(warnings, 1);
        assert_eq!(overview.completed_count, 20);
        assert!(overview.entries.iter().all(|e| e.state == ResourceState::Completed));

        let healthy_path = path(&refs, 3);
        let (_, healthy) = warn_lines(|| PathOverview::build(Some(&healthy_path), &catalog));
        assert_eq!(healthy, 0);
    }

    #[test]
    fn preview_hides_the_tail() {
        let ids: Vec<String> = (0..10).map(|i| format!("r{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let overview = PathOverview::build(Some(&path(&refs, 0)), &catalog(&refs));
        let preview = overview.preview(8);
        assert_eq!(preview.entries.len(), 8);
        assert_eq!(preview.hidden, 2);
        assert_eq!(preview.more_label().as_deref(), Some("And 2 more resources..."));
        assert_eq!(overview.preview(20).hidden, 0);
    }
}
