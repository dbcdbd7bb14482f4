//! Pure derivations from learner records to display-ready numbers.
//!
//! Every function here is total: empty paths and empty result sets produce
//! zeros, never NaN, and an out-of-range path cursor is clamped (and logged)
//! rather than propagated.

use serde::Serialize;

use crate::error::NotFound;
use crate::model::{LearningPath, QuizResult, Resource, ResourceCatalog, Score, ScoreBand};

/// `100 * count / total`, or 0 when `total` is 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 100.0) / total as f64
}

/// Share of the path already consumed, in `[0, 100]`.
#[must_use]
pub fn completion_percentage(path: &LearningPath) -> f64 {
    percentage_of(path.current_position(), path.len())
}

/// Resources before the cursor.
#[must_use]
pub fn completed_count(path: &LearningPath) -> usize {
    path.current_position()
}

/// Resources from the cursor to the end, never negative.
#[must_use]
pub fn remaining_count(path: &LearningPath) -> usize {
    path.len().saturating_sub(path.current_position())
}

#[must_use]
pub fn classify_score(score: Score) -> ScoreBand {
    ScoreBand::of(score)
}

/// Mean score, or 0 for no results.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_score(results: &[QuizResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results.iter().map(|r| r.score().value()).sum();
    total / results.len() as f64
}

/// Results in the `Pass` band.
#[must_use]
pub fn passed_count(results: &[QuizResult]) -> usize {
    results.iter().filter(|r| r.band().is_pass()).count()
}

/// Consecutive passes ending at the most recent result.
///
/// Results are ordered by `recorded_at`; input order breaks ties.
#[must_use]
pub fn pass_streak(results: &[QuizResult]) -> usize {
    let mut ordered: Vec<&QuizResult> = results.iter().collect();
    ordered.sort_by_key(|r| r.recorded_at());
    ordered
        .iter()
        .rev()
        .take_while(|r| r.band().is_pass())
        .count()
}

/// A truncated, de-duplicated list of topics plus how many were cut.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeakTopicsSummary {
    pub topics: Vec<String>,
    pub omitted: usize,
}

impl WeakTopicsSummary {
    /// "+N more" when topics were omitted.
    #[must_use]
    pub fn more_label(&self) -> Option<String> {
        (self.omitted > 0).then(|| format!("+{} more", self.omitted))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty() && self.omitted == 0
    }
}

/// First `limit` distinct labels in order of first appearance.
#[must_use]
pub fn weak_topics_summary<I, S>(labels: I, limit: usize) -> WeakTopicsSummary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut distinct = crate::model::normalize_labels(labels);
    let omitted = distinct.len().saturating_sub(limit);
    distinct.truncate(limit);
    WeakTopicsSummary {
        topics: distinct,
        omitted,
    }
}

/// Weak-topic summary over every result, in result order.
#[must_use]
pub fn weak_topics_across(results: &[QuizResult], limit: usize) -> WeakTopicsSummary {
    weak_topics_summary(
        results.iter().flat_map(|r| r.weak_topics().iter()),
        limit,
    )
}

/// Where a path index sits relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceState {
    Completed,
    Current,
    Upcoming,
}

#[must_use]
pub fn resource_state(path: &LearningPath, index: usize) -> ResourceState {
    let position = path.current_position();
    if index < position {
        ResourceState::Completed
    } else if index == position {
        ResourceState::Current
    } else {
        ResourceState::Upcoming
    }
}

/// The resource under the cursor.
///
/// `Ok(None)` means the path is finished. A cursor past the end or an id
/// missing from the catalog is `NotFound`.
///
/// # Errors
///
/// Returns `NotFound` when the cursor is past the end or the catalog lacks
/// the resource.
pub fn resolve_current_resource<'a>(
    path: &LearningPath,
    catalog: &'a ResourceCatalog,
) -> Result<Option<&'a Resource>, NotFound> {
    if path.integrity_warning().is_some() {
        return Err(NotFound::PositionPastEnd {
            position: path.raw_position(),
            length: path.len(),
        });
    }
    let Some(id) = path.resource_at(path.raw_position()) else {
        return Ok(None);
    };
    catalog
        .get(id)
        .map(Some)
        .ok_or_else(|| NotFound::MissingFromCatalog(id.clone()))
}

/// Derived progress numbers for one learner. Never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub completion_percentage: f64,
    pub completed_count: usize,
    pub total_count: usize,
    pub remaining_count: usize,
    pub average_score: f64,
    pub passed_count: usize,
    pub pass_streak: usize,
}

impl ProgressSnapshot {
    /// Derive the snapshot; a missing path counts as an empty one.
    #[must_use]
    pub fn compute(path: Option<&LearningPath>, results: &[QuizResult]) -> Self {
        if let Some(warning) = path.and_then(LearningPath::integrity_warning) {
            warning.log();
        }
        let (completion_percentage, completed, total, remaining) = match path {
            Some(path) => (
                completion_percentage(path),
                completed_count(path),
                path.len(),
                remaining_count(path),
            ),
            None => (0.0, 0, 0, 0),
        };
        Self {
            completion_percentage,
            completed_count: completed,
            total_count: total,
            remaining_count: remaining,
            average_score: average_score(results),
            passed_count: passed_count(results),
            pass_streak: pass_streak(results),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Difficulty, LearnerId, PathId, ResourceId, ResourceKind, StyleAffinity,
    };
    use crate::time::fixed_now;
    use chrono::Duration;

    fn rid(s: &str) -> ResourceId {
        ResourceId::new(s).unwrap()
    }

    fn path(len: usize, position: usize) -> LearningPath {
        let resources = (0..len).map(|i| rid(&format!("r{i}"))).collect();
        LearningPath::from_persisted(
            PathId::generate(),
            LearnerId::generate(),
            resources,
            position,
            fixed_now(),
            fixed_now(),
        )
    }

    fn result(score: f64, minutes: i64, topics: &[&str]) -> QuizResult {
        QuizResult::from_persisted(
            rid("r0"),
            score,
            3,
            0,
            topics.iter().map(ToString::to_string).collect(),
            fixed_now() + Duration::minutes(minutes),
        )
        .unwrap()
    }

    fn catalog_entry(id: &str) -> Resource {
        Resource::new(
            rid(id),
            format!("Title {id}"),
            ResourceKind::Article,
            "topic",
            Difficulty::new(1).unwrap(),
            StyleAffinity::Universal,
        )
        .unwrap()
    }

    #[test]
    fn completion_is_zero_for_empty_path() {
        let p = path(0, 0);
        assert_eq!(completion_percentage(&p), 0.0);
        assert_eq!(remaining_count(&p), 0);
    }

    #[test]
    fn completion_stays_within_bounds() {
        for len in 0..6 {
            for position in 0..9 {
                let pct = completion_percentage(&path(len, position));
                assert!((0.0..=100.0).contains(&pct), "len={len} position={position}");
            }
        }
    }

    #[test]
    fn three_of_ten_is_thirty_percent() {
        let p = path(10, 3);
        assert_eq!(completion_percentage(&p), 30.0);
        assert_eq!(remaining_count(&p), 7);
        assert_eq!(completed_count(&p), 3);
    }

    #[test]
    fn overflowed_cursor_is_clamped() {
        let p = path(4, 9);
        assert_eq!(completion_percentage(&p), 100.0);
        assert_eq!(remaining_count(&p), 0);
    }

    #[test]
    fn average_of_empty_is_zero() {
        assert_eq!(average_score(&[]), 0.0);
    }

    #[test]
    fn average_of_eighty_and_sixty_is_seventy() {
        let results = [result(80.0, 0, &[]), result(60.0, 1, &[])];
        assert_eq!(average_score(&results), 70.0);
    }

    #[test]
    fn classify_uses_single_pass_threshold() {
        assert_eq!(classify_score(Score::new(80.0).unwrap()), ScoreBand::Pass);
        assert_eq!(classify_score(Score::new(70.0).unwrap()), ScoreBand::Borderline);
        let results = [result(75.0, 0, &[]), result(85.0, 1, &[])];
        assert_eq!(passed_count(&results), 1);
    }

    #[test]
    fn weak_topics_dedupes_and_counts_omitted() {
        let summary = weak_topics_summary(["a", "b", "a", "c"], 2);
        assert_eq!(summary.topics, vec!["a", "b"]);
        assert_eq!(summary.omitted, 1);
        assert_eq!(summary.more_label().as_deref(), Some("+1 more"));
    }

    #[test]
    fn weak_topics_under_limit_omits_nothing() {
        let summary = weak_topics_summary(["a"], 5);
        assert_eq!(summary.topics, vec!["a"]);
        assert_eq!(summary.omitted, 0);
        assert_eq!(summary.more_label(), None);
    }

    #[test]
    fn weak_topics_across_results_keeps_result_order() {
        let results = [
            result(50.0, 0, &["limits", "derivatives"]),
            result(40.0, 1, &["derivatives", "integrals"]),
        ];
        let summary = weak_topics_across(&results, 2);
        assert_eq!(summary.topics, vec!["limits", "derivatives"]);
        assert_eq!(summary.omitted, 1);
    }

    #[test]
    fn resource_state_partitions_indices() {
        let p = path(5, 2);
        let states: Vec<_> = (0..5).map(|i| resource_state(&p, i)).collect();
        assert_eq!(
            states,
            vec![
                ResourceState::Completed,
                ResourceState::Completed,
                ResourceState::Current,
                ResourceState::Upcoming,
                ResourceState::Upcoming,
            ]
        );
    }

    #[test]
    fn indices_below_cursor_are_never_upcoming() {
        for position in 0..=4 {
            let p = path(4, position);
            for i in 0..position {
                assert_ne!(resource_state(&p, i), ResourceState::Upcoming);
            }
        }
    }

    #[test]
    fn resolve_returns_none_when_complete() {
        let catalog: ResourceCatalog = vec![catalog_entry("r0")].into_iter().collect();
        assert_eq!(resolve_current_resource(&path(1, 1), &catalog), Ok(None));
    }

    #[test]
    fn resolve_past_end_is_not_found() {
        let catalog = ResourceCatalog::new();
        let err = resolve_current_resource(&path(2, 3), &catalog).unwrap_err();
        assert_eq!(
            err,
            NotFound::PositionPastEnd {
                position: 3,
                length: 2
            }
        );
    }

    #[test]
    fn resolve_missing_catalog_entry_is_not_found() {
        let catalog: ResourceCatalog = vec![catalog_entry("r0")].into_iter().collect();
        let err = resolve_current_resource(&path(3, 1), &catalog).unwrap_err();
        assert_eq!(err, NotFound::MissingFromCatalog(rid("r1")));
    }

    #[test]
    fn resolve_finds_current_entry() {
        let catalog: ResourceCatalog = vec![catalog_entry("r0"), catalog_entry("r1")]
            .into_iter()
            .collect();
        let found = resolve_current_resource(&path(3, 1), &catalog).unwrap();
        assert_eq!(found.map(|r| r.title.as_str()), Some("Title r1"));
    }

    #[test]
    fn streak_counts_back_from_latest_regardless_of_input_order() {
        let results = [
            result(90.0, 30, &[]),
            result(50.0, 10, &[]),
            result(85.0, 20, &[]),
            result(95.0, 0, &[]),
        ];
        assert_eq!(pass_streak(&results), 2);
        assert_eq!(pass_streak(&[result(40.0, 0, &[])]), 0);
        assert_eq!(pass_streak(&[]), 0);
    }

    #[test]
    fn snapshot_without_path_is_zeroed() {
        let snapshot = ProgressSnapshot::compute(None, &[]);
        assert_eq!(snapshot, ProgressSnapshot::default());
    }

    #[test]
    fn snapshot_combines_path_and_results() {
        let p = path(4, 1);
        let results = [result(100.0, 0, &[]), result(60.0, 1, &[])];
        let snapshot = ProgressSnapshot::compute(Some(&p), &results);
        assert_eq!(snapshot.completion_percentage, 25.0);
        assert_eq!(snapshot.remaining_count, 3);
        assert_eq!(snapshot.average_score, 80.0);
        assert_eq!(snapshot.passed_count, 1);
        assert_eq!(snapshot.pass_streak, 0);
    }

    #[test]
    fn percentage_of_two_thirds() {
        let pct = percentage_of(2, 3);
        assert!((pct - 66.666_666).abs() < 1e-3);
        assert_eq!(percentage_of(5, 0), 0.0);
    }
}
