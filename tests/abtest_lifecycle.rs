use creator_backoffice::abtest::lifecycle::{can_transition, log_action, transition};
use creator_backoffice::abtest::validate::{validate_schedule, validate_variants, VariantInput};
use creator_backoffice::domain::abtest::{AbTest, TestStatus, TestType};
use creator_backoffice::service::test_engine::build_snapshot;
use uuid::Uuid;

const ALL: [TestStatus; 4] = [
    TestStatus::Draft,
    TestStatus::Active,
    TestStatus::Paused,
    TestStatus::Completed,
];

#[test]
fn only_the_five_legal_transitions_are_accepted() {
    let legal = [
        (TestStatus::Draft, TestStatus::Active),
        (TestStatus::Active, TestStatus::Paused),
        (TestStatus::Paused, TestStatus::Active),
        (TestStatus::Active, TestStatus::Completed),
        (TestStatus::Paused, TestStatus::Completed),
    ];

    for from in ALL {
        for to in ALL {
            let expected = legal.contains(&(from, to));
            assert_eq!(
                can_transition(from, to),
                expected,
                "{} -> {}",
                from.as_str(),
                to.as_str()
            );
        }
    }
}

#[test]
fn completed_is_terminal() {
    for to in ALL {
        assert!(!can_transition(TestStatus::Completed, to));
    }
}

#[test]
fn transitions_map_to_audit_actions() {
    assert_eq!(log_action(TestStatus::Draft, TestStatus::Active), Some("started"));
    assert_eq!(log_action(TestStatus::Paused, TestStatus::Active), Some("resumed"));
    assert_eq!(log_action(TestStatus::Active, TestStatus::Paused), Some("paused"));
    assert_eq!(log_action(TestStatus::Active, TestStatus::Completed), Some("stopped"));
    assert_eq!(log_action(TestStatus::Paused, TestStatus::Completed), Some("stopped"));
    assert_eq!(log_action(TestStatus::Draft, TestStatus::Completed), None);

    let err = transition(TestStatus::Completed, TestStatus::Active).unwrap_err();
    assert!(err.contains("invalid status transition"));
}

fn variant(name: &str, thumbnail: Option<&str>, title: Option<&str>) -> VariantInput {
    VariantInput {
        name: name.to_string(),
        thumbnail_url: thumbnail.map(str::to_string),
        title: title.map(str::to_string),
        description: None,
    }
}

#[test]
fn variant_count_must_be_two_or_three() {
    let one = vec![variant("A", Some("https://img/a.png"), None)];
    assert!(validate_variants(TestType::Thumbnail, &one).is_err());

    let two = vec![
        variant("A", Some("https://img/a.png"), None),
        variant("B", Some("https://img/b.png"), None),
    ];
    assert!(validate_variants(TestType::Thumbnail, &two).is_ok());

    let four = vec![
        variant("A", Some("https://img/a.png"), None),
        variant("B", Some("https://img/b.png"), None),
        variant("C", Some("https://img/c.png"), None),
        variant("D", Some("https://img/d.png"), None),
    ];
    assert!(validate_variants(TestType::Thumbnail, &four).is_err());
}

#[test]
fn per_type_content_requirements() {
    let missing_thumb = vec![
        variant("A", Some("https://img/a.png"), None),
        variant("B", None, None),
    ];
    assert!(validate_variants(TestType::Thumbnail, &missing_thumb).is_err());

    let titles = vec![
        variant("A", None, Some("Title A")),
        variant("B", None, Some("Title B")),
    ];
    assert!(validate_variants(TestType::Title, &titles).is_ok());
    assert!(validate_variants(TestType::Combined, &titles).is_err());

    let combined = vec![
        variant("A", Some("https://img/a.png"), Some("Title A")),
        variant("B", Some("https://img/b.png"), Some("Title B")),
    ];
    assert!(validate_variants(TestType::Combined, &combined).is_ok());
}

#[test]
fn variant_names_must_be_unique() {
    let dup = vec![
        variant("A", Some("https://img/a.png"), None),
        variant("A", Some("https://img/b.png"), None),
    ];
    assert!(validate_variants(TestType::Thumbnail, &dup).is_err());
}

#[test]
fn schedule_bounds() {
    assert!(validate_schedule(168, 24).is_ok());
    assert!(validate_schedule(0, 1).is_err());
    assert!(validate_schedule(24, 0).is_err());
    assert!(validate_schedule(24, 48).is_err());
}

fn test_with(status: TestStatus, started_hours_ago: i64, duration_hours: i32) -> AbTest {
    let now = chrono::Utc::now();
    let start = now - chrono::Duration::hours(started_hours_ago);
    AbTest {
        test_id: Uuid::new_v4(),
        creator_id: Uuid::new_v4(),
        video_id: "vid-1".to_string(),
        video_title: "Launch video".to_string(),
        test_type: TestType::Thumbnail,
        status,
        start_date: Some(start),
        end_date: Some(start + chrono::Duration::hours(duration_hours as i64)),
        duration_hours,
        rotation_frequency_hours: 4,
        performance_threshold: 0.05,
        auto_select_winner: true,
        winner_variant_id: None,
        completed_at: None,
        created_at: start,
    }
}

#[test]
fn snapshot_progress_tracks_elapsed_time() {
    let now = chrono::Utc::now();

    let halfway = build_snapshot(test_with(TestStatus::Active, 12, 24), Vec::new(), now);
    assert!((halfway.progress_percentage - 50.0).abs() < 1.0);
    let remaining = halfway.time_remaining_seconds.unwrap();
    assert!(remaining > 0 && remaining <= 12 * 3600);

    let done = build_snapshot(test_with(TestStatus::Completed, 48, 24), Vec::new(), now);
    assert_eq!(done.progress_percentage, 100.0);
    assert_eq!(done.time_remaining_seconds, None);

    let overdue = build_snapshot(test_with(TestStatus::Active, 48, 24), Vec::new(), now);
    assert_eq!(overdue.progress_percentage, 100.0);
    assert_eq!(overdue.time_remaining_seconds, Some(0));
}
