use pathwise_core::model::{
    Difficulty, DisplaySettings, LearnerDraft, QuizResultDraft, Resource, ResourceId,
    ResourceKind, ScoreBand, StyleAffinity,
};
use pathwise_core::progress::ResourceState;
use pathwise_core::time::fixed_now;
use services::{AppServices, Clock, ViewError, ViewState};
use storage::repository::Storage;

fn rid(raw: &str) -> ResourceId {
    ResourceId::new(raw).unwrap()
}

async fn seed_catalog(storage: &Storage, ids: &[&str]) {
    for (i, id) in ids.iter().enumerate() {
        let resource = Resource::new(
            rid(id),
            format!("Lesson {}", i + 1),
            ResourceKind::Interactive,
            "linear equations",
            Difficulty::new(2).unwrap(),
            StyleAffinity::Universal,
        )
        .unwrap();
        storage.resources.upsert_resource(&resource).await.unwrap();
    }
}

fn quiz(resource: &str, score: f64, topics: &[&str]) -> QuizResultDraft {
    QuizResultDraft {
        resource_id: rid(resource),
        score,
        questions_answered: 10,
        correct_answers: 7,
        weak_topics: topics.iter().map(ToString::to_string).collect(),
    }
}

#[tokio::test]
async fn sqlite_learner_journey_drives_every_view() {
    let storage = Storage::sqlite("sqlite:file:memdb_learner_journey?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let ids = ["alg_001", "alg_002", "alg_003", "alg_004"];
    seed_catalog(&storage, &ids).await;

    let app = AppServices::from_storage(
        &storage,
        Clock::fixed(fixed_now()),
        DisplaySettings::default(),
    );
    let (learner, _) = app
        .learners()
        .create_learner(
            LearnerDraft {
                name: "Grace".into(),
                learning_style: "auditory".into(),
                subject: "algebra".into(),
                knowledge_level: 3,
                weak_areas: vec!["graphing".into()],
            },
            ids.iter().map(|id| rid(id)).collect(),
        )
        .await
        .expect("create learner");

    app.learners()
        .record_quiz_result(learner.id(), quiz("alg_001", 92.0, &["slopes"]))
        .await
        .expect("first quiz");
    app.learners()
        .record_quiz_result(
            learner.id(),
            quiz("alg_002", 65.0, &["slopes", "intercepts", "factoring"]),
        )
        .await
        .expect("second quiz");

    let overview = app
        .views()
        .load_path_overview(learner.id())
        .await
        .into_loaded()
        .expect("overview loaded");
    assert_eq!(overview.completion_percentage, 25.0);
    assert_eq!(overview.remaining_count, 3);
    assert_eq!(overview.current_resource.unwrap().title, "Lesson 2");
    assert_eq!(overview.entries[0].state, ResourceState::Completed);
    assert_eq!(overview.entries[1].state, ResourceState::Current);

    let dashboard = app
        .views()
        .load_progress_dashboard(learner.id())
        .await
        .into_loaded()
        .expect("dashboard loaded");
    assert_eq!(dashboard.learner.name, "Grace");
    assert_eq!(dashboard.passed_count, 1);
    assert_eq!(dashboard.average_score, 78.5);
    assert_eq!(dashboard.quiz_entries.len(), 2);
    assert_eq!(dashboard.quiz_entries[0].band, ScoreBand::Borderline);
    assert_eq!(
        dashboard.quiz_entries[0].resource_title.as_deref(),
        Some("Lesson 2")
    );
    assert_eq!(dashboard.quiz_entries[0].weak_topics.omitted, 1);
    assert_eq!(
        dashboard.weak_topics.topics,
        vec!["slopes", "intercepts", "factoring"]
    );

    let analytics = app
        .views()
        .load_analytics()
        .await
        .into_loaded()
        .expect("analytics loaded");
    assert_eq!(analytics.total_learners, 1);
    assert_eq!(analytics.total_paths, 1);
    assert_eq!(analytics.total_quiz_results, 2);
    assert_eq!(analytics.average_completion_rate, 25.0);
    assert_eq!(analytics.learning_styles.len(), 1);
    assert_eq!(analytics.learning_styles[0].percentage, 100.0);
}

#[tokio::test]
async fn unknown_learner_fails_with_not_found() {
    let storage = Storage::in_memory();
    let app = AppServices::from_storage(&storage, Clock::default(), DisplaySettings::default());
    let id = pathwise_core::model::LearnerId::generate();

    assert_eq!(
        app.views().load_path_overview(id).await,
        ViewState::Failed(ViewError::NotFound)
    );
    assert_eq!(
        app.views().load_progress_dashboard(id).await,
        ViewState::Failed(ViewError::NotFound)
    );
}
