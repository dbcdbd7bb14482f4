use serde::Serialize;

use pathwise_core::model::{Learner, LearningPath, LearningStyle};
use pathwise_core::progress::{completion_percentage, percentage_of};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleShare {
    pub style: LearningStyle,
    pub count: usize,
    pub percentage: f64,
}

/// Admin overview across every learner.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analytics {
    pub total_learners: usize,
    pub total_paths: usize,
    pub total_quiz_results: u64,
    pub average_completion_rate: f64,
    pub learning_styles: Vec<StyleShare>,
}

impl Analytics {
    #[must_use]
    pub fn build(learners: &[Learner], paths: &[LearningPath], total_quiz_results: u64) -> Self {
        let total = learners.len();
        let learning_styles = LearningStyle::ALL
            .into_iter()
            .filter_map(|style| {
                let count = learners
                    .iter()
                    .filter(|l| l.learning_style() == style)
                    .count();
                (count > 0).then(|| StyleShare {
                    style,
                    count,
                    percentage: percentage_of(count, total),
                })
            })
            .collect();

        Self {
            total_learners: total,
            total_paths: paths.len(),
            total_quiz_results,
            average_completion_rate: average_completion(paths),
            learning_styles,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn average_completion(paths: &[LearningPath]) -> f64 {
    if paths.is_empty() {
        return 0.0;
    }
    let sum: f64 = paths.iter().map(completion_percentage).sum();
    sum / paths.len() as f64
}
