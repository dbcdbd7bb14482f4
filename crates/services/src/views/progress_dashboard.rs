use chrono::{DateTime, Utc};
use serde::Serialize;

use pathwise_core::model::{
    DisplaySettings, Learner, LearnerId, LearningPath, LearningStyle, QuizResult, ResourceId,
    ResourceCatalog, ScoreBand, Subject,
};
use pathwise_core::progress::{ProgressSnapshot, WeakTopicsSummary, weak_topics_across, weak_topics_summary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearnerSummary {
    pub id: LearnerId,
    pub name: String,
    pub learning_style: LearningStyle,
    pub subject: Subject,
    pub knowledge_level: u8,
    pub weak_areas: Vec<String>,
}

impl From<&Learner> for LearnerSummary {
    fn from(learner: &Learner) -> Self {
        Self {
            id: learner.id(),
            name: learner.name().to_string(),
            learning_style: learner.learning_style(),
            subject: learner.subject(),
            knowledge_level: learner.knowledge_level().value(),
            weak_areas: learner.weak_areas().to_vec(),
        }
    }
}

/// One row of the quiz history, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizEntry {
    pub resource_id: ResourceId,
    pub resource_title: Option<String>,
    pub score: f64,
    pub band: ScoreBand,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub weak_topics: WeakTopicsSummary,
    pub recorded_at: DateTime<Utc>,
}

/// Display-ready progress for one learner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressDashboard {
    pub learner: LearnerSummary,
    pub completion_percentage: f64,
    pub completed_count: usize,
    pub total_count: usize,
    pub remaining_count: usize,
    pub average_score: f64,
    pub passed_count: usize,
    pub pass_streak: usize,
    pub quiz_count: usize,
    pub quiz_entries: Vec<QuizEntry>,
    pub weak_topics: WeakTopicsSummary,
}

impl ProgressDashboard {
    /// Build the dashboard. A missing path contributes zero counts.
    #[must_use]
    pub fn build(
        learner: &Learner,
        path: Option<&LearningPath>,
        results: &[QuizResult],
        catalog: &ResourceCatalog,
        settings: &DisplaySettings,
    ) -> Self {
        let snapshot = ProgressSnapshot::compute(path, results);

        let mut ordered: Vec<&QuizResult> = results.iter().collect();
        ordered.sort_by_key(|r| r.recorded_at());
        let quiz_entries = ordered
            .into_iter()
            .rev()
            .map(|result| QuizEntry {
                resource_id: result.resource_id().clone(),
                resource_title: catalog.get(result.resource_id()).map(|r| r.title.clone()),
                score: result.score().value(),
                band: result.band(),
                questions_answered: result.questions_answered(),
                correct_answers: result.correct_answers(),
                weak_topics: weak_topics_summary(
                    result.weak_topics(),
                    settings.entry_topic_limit(),
                ),
                recorded_at: result.recorded_at(),
            })
            .collect();

        Self {
            learner: LearnerSummary::from(learner),
            completion_percentage: snapshot.completion_percentage,
            completed_count: snapshot.completed_count,
            total_count: snapshot.total_count,
            remaining_count: snapshot.remaining_count,
            average_score: snapshot.average_score,
            passed_count: snapshot.passed_count,
            pass_streak: snapshot.pass_streak,
            quiz_count: results.len(),
            quiz_entries,
            weak_topics: weak_topics_across(results, settings.weak_topic_limit()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pathwise_core::model::{LearnerDraft, PathId};
    use pathwise_core::time::fixed_now;

    fn learner() -> Learner {
        LearnerDraft {
            name: "Ada".into(),
            learning_style: "visual".into(),
            subject: "algebra".into(),
            knowledge_level: 2,
            weak_areas: vec!["graphing".into()],
        }
        .validate(fixed_now())
        .unwrap()
        .assign_id(LearnerId::generate())
    }

    fn result(score: f64, minutes: i64, topics: &[&str]) -> QuizResult {
        QuizResult::from_persisted(
            ResourceId::new("alg_001").unwrap(),
            score,
            5,
            3,
            topics.iter().map(ToString::to_string).collect(),
            fixed_now() + Duration::minutes(minutes),
        )
        .unwrap()
    }

    #[test]
    fn no_path_and_no_results_is_all_zero() {
        let dashboard = ProgressDashboard::build(
            &learner(),
            None,
            &[],
            &ResourceCatalog::new(),
            &DisplaySettings::default(),
        );
        assert_eq!(dashboard.completion_percentage, 0.0);
        assert_eq!(dashboard.average_score, 0.0);
        assert_eq!(dashboard.passed_count, 0);
        assert_eq!(dashboard.pass_streak, 0);
        assert!(dashboard.quiz_entries.is_empty());
        assert!(dashboard.weak_topics.is_empty());
        assert_eq!(dashboard.learner.name, "Ada");
    }

    #[test]
    fn aggregates_results_and_truncates_topics() {
        let ids = (0..10)
            .map(|i| ResourceId::new(format!("r{i}")).unwrap())
            .collect();
        let path = LearningPath::from_persisted(
            PathId::generate(),
            LearnerId::generate(),
            ids,
            3,
            fixed_now(),
            fixed_now(),
        );
        let results = vec![
            result(90.0, 2, &["factoring", "slopes", "graphing"]),
            result(50.0, 0, &["factoring"]),
            result(85.0, 1, &[]),
        ];
        let dashboard = ProgressDashboard::build(
            &learner(),
            Some(&path),
            &results,
            &ResourceCatalog::new(),
            &DisplaySettings::default(),
        );

        assert_eq!(dashboard.completion_percentage, 30.0);
        assert_eq!(dashboard.remaining_count, 7);
        assert_eq!(dashboard.passed_count, 2);
        assert_eq!(dashboard.pass_streak, 2);
        assert_eq!(dashboard.quiz_count, 3);

        let newest = &dashboard.quiz_entries[0];
        assert_eq!(newest.score, 90.0);
        assert_eq!(newest.band, ScoreBand::Pass);
        assert_eq!(newest.weak_topics.topics, vec!["factoring", "slopes"]);
        assert_eq!(newest.weak_topics.more_label().as_deref(), Some("+1 more"));
        assert_eq!(dashboard.quiz_entries[2].band, ScoreBand::Fail);

        assert_eq!(
            dashboard.weak_topics.topics,
            vec!["factoring", "slopes", "graphing"]
        );
    }

    #[test]
    fn overflowed_cursor_warns_once_per_dashboard() {
        let ids = (0..4)
            .map(|i| ResourceId::new(format!("r{i}")).unwrap())
            .collect();
        let path = LearningPath::from_persisted(
            PathId::generate(),
            LearnerId::generate(),
            ids,
            11,
            fixed_now(),
            fixed_now(),
        );
        let (dashboard, warnings) = crate::views::capture::warn_lines(|| {
            ProgressDashboard::build(
                &learner(),
                Some(&path),
                &[],
                &ResourceCatalog::new(),
                &DisplaySettings::default(),
            )
        });
        assert_eq!(warnings, 1);
        assert_eq!(dashboard.completion_percentage, 100.0);
        assert_eq!(dashboard.remaining_count, 0);
    }
}
