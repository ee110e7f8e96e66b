use creator_backoffice::abtest::rotation::{current_variant, next_variant, rotation_due};
use creator_backoffice::domain::abtest::{TestType, TestVariant};
use creator_backoffice::google::mock::MockGoogle;
use creator_backoffice::service::scheduler::push_variant_content;
use uuid::Uuid;

fn variant(name: &str, applied_hours_ago: Option<i64>) -> TestVariant {
    TestVariant {
        variant_id: Uuid::new_v4(),
        test_id: Uuid::new_v4(),
        variant_name: name.to_string(),
        thumbnail_url: Some(format!("https://img/{name}.png")),
        title: Some(format!("Title {name}")),
        description: None,
        impressions: 0,
        clicks: 0,
        views: 0,
        ctr: 0.0,
        is_winner: false,
        applied_at: applied_hours_ago
            .map(|h| chrono::Utc::now() - chrono::Duration::hours(h)),
    }
}

#[test]
fn first_variant_is_current_before_any_application() {
    let variants = vec![variant("A", None), variant("B", None)];
    assert_eq!(current_variant(&variants).unwrap().variant_name, "A");
    assert_eq!(next_variant(&variants).unwrap().variant_name, "A");
}

#[test]
fn rotation_cycles_in_name_order() {
    let variants = vec![variant("A", Some(2)), variant("B", None), variant("C", None)];
    assert_eq!(next_variant(&variants).unwrap().variant_name, "B");

    let variants = vec![variant("A", Some(4)), variant("B", Some(2)), variant("C", None)];
    assert_eq!(next_variant(&variants).unwrap().variant_name, "C");

    // Wraps around from the last variant back to the first.
    let variants = vec![variant("A", Some(6)), variant("B", Some(4)), variant("C", Some(2))];
    assert_eq!(next_variant(&variants).unwrap().variant_name, "A");
}

#[test]
fn most_recently_applied_variant_is_current() {
    let variants = vec![variant("A", Some(6)), variant("B", Some(1)), variant("C", None)];
    assert_eq!(current_variant(&variants).unwrap().variant_name, "B");
}

#[test]
fn rotation_due_respects_dwell_time() {
    let now = chrono::Utc::now();
    assert!(rotation_due(None, 4, now));
    assert!(rotation_due(Some(now - chrono::Duration::hours(5)), 4, now));
    assert!(!rotation_due(Some(now - chrono::Duration::hours(3)), 4, now));
}

#[tokio::test]
async fn combined_apply_updates_title_and_thumbnail() {
    let mock = MockGoogle::new().with_video("v1", "Old Title", "desc");
    let v = variant("A", None);

    push_variant_content(&mock, "token", "v1", TestType::Combined, &v)
        .await
        .unwrap();

    let state = mock.video_state("v1").unwrap();
    assert_eq!(state.title, "Title A");
    assert_eq!(state.thumbnail_url.as_deref(), Some("https://img/A.png"));
}

#[tokio::test]
async fn combined_apply_rolls_back_title_when_thumbnail_fails() {
    let mut mock = MockGoogle::new().with_video("v1", "Old Title", "desc");
    mock.fail_set_thumbnail = true;
    let v = variant("A", None);

    let result = push_variant_content(&mock, "token", "v1", TestType::Combined, &v).await;
    assert!(result.is_err());

    // Never half-applied: the title reverts and no thumbnail is set.
    let state = mock.video_state("v1").unwrap();
    assert_eq!(state.title, "Old Title");
    assert_eq!(state.thumbnail_url, None);
}

#[tokio::test]
async fn combined_apply_leaves_video_untouched_when_title_fails() {
    let mut mock = MockGoogle::new().with_video("v1", "Old Title", "desc");
    mock.fail_update_snippet = true;
    let v = variant("A", None);

    let result = push_variant_content(&mock, "token", "v1", TestType::Combined, &v).await;
    assert!(result.is_err());

    let state = mock.video_state("v1").unwrap();
    assert_eq!(state.title, "Old Title");
    assert_eq!(state.thumbnail_url, None);
}

#[tokio::test]
async fn single_field_tests_only_touch_their_field() {
    let mock = MockGoogle::new().with_video("v1", "Old Title", "old desc");

    let v = variant("A", None);
    push_variant_content(&mock, "token", "v1", TestType::Thumbnail, &v)
        .await
        .unwrap();
    let state = mock.video_state("v1").unwrap();
    assert_eq!(state.title, "Old Title");
    assert_eq!(state.thumbnail_url.as_deref(), Some("https://img/A.png"));

    let described = TestVariant {
        description: Some("new description".to_string()),
        ..variant("B", None)
    };
    push_variant_content(&mock, "token", "v1", TestType::Description, &described)
        .await
        .unwrap();
    let state = mock.video_state("v1").unwrap();
    assert_eq!(state.title, "Old Title");
    assert_eq!(state.description, "new description");
}
