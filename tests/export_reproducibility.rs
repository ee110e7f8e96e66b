use chrono::{NaiveDate, TimeZone, Utc};
use creator_backoffice::domain::abtest::{AbTest, TestSnapshot, TestStatus, TestType, TestVariant};
use creator_backoffice::export::csv::{test_results_csv, video_metrics_csv, MetricsExportRow};
use creator_backoffice::export::pdf::test_results_pdf;
use uuid::Uuid;

fn snapshot() -> TestSnapshot {
    let test_id = Uuid::from_u128(0x11);
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let test = AbTest {
        test_id,
        creator_id: Uuid::from_u128(0x22),
        video_id: "vid-123".to_string(),
        video_title: "Launch video".to_string(),
        test_type: TestType::Combined,
        status: TestStatus::Completed,
        start_date: Some(start),
        end_date: Some(start + chrono::Duration::hours(168)),
        duration_hours: 168,
        rotation_frequency_hours: 24,
        performance_threshold: 0.05,
        auto_select_winner: true,
        winner_variant_id: Some(Uuid::from_u128(0x33)),
        completed_at: Some(start + chrono::Duration::hours(100)),
        created_at: start,
    };

    let variants = vec![
        TestVariant {
            variant_id: Uuid::from_u128(0x33),
            test_id,
            variant_name: "A".to_string(),
            thumbnail_url: Some("https://img/a.png".to_string()),
            title: Some("Title A".to_string()),
            description: None,
            impressions: 4000,
            clicks: 520,
            views: 400,
            ctr: 13.0,
            is_winner: true,
            applied_at: Some(start),
        },
        TestVariant {
            variant_id: Uuid::from_u128(0x44),
            test_id,
            variant_name: "B".to_string(),
            thumbnail_url: Some("https://img/b.png".to_string()),
            title: Some("Title B".to_string()),
            description: None,
            impressions: 4000,
            clicks: 380,
            views: 380,
            ctr: 9.5,
            is_winner: false,
            applied_at: Some(start + chrono::Duration::hours(24)),
        },
    ];

    TestSnapshot {
        test,
        variants,
        current_variant_id: Some(Uuid::from_u128(0x33)),
        progress_percentage: 100.0,
        time_remaining_seconds: None,
    }
}

#[test]
fn test_results_csv_is_byte_reproducible() {
    let first = test_results_csv(&snapshot()).unwrap();
    let second = test_results_csv(&snapshot()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_results_csv_contains_the_report_sections() {
    let bytes = test_results_csv(&snapshot()).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert!(text.starts_with("A/B Test Results"));
    assert!(text.contains("Video ID,vid-123"));
    assert!(text.contains("Variant,Impressions,Clicks,Views,CTR (%),Is Winner"));
    assert!(text.contains("A,4000,520,400,13.00,Yes"));
    assert!(text.contains("B,4000,380,380,9.50,No"));
    assert!(text.contains("Winning Variant,A"));
    // Combined tests list both content fields.
    assert!(text.contains("Thumbnail URL,https://img/a.png"));
    assert!(text.contains("Title,Title B"));
}

#[test]
fn test_results_pdf_is_byte_reproducible() {
    let first = test_results_pdf(&snapshot());
    let second = test_results_pdf(&snapshot());
    assert_eq!(first, second);

    assert!(first.starts_with(b"%PDF-1.4"));
    assert!(first.ends_with(b"%%EOF\n"));
    // No creation-date metadata sneaks into the document.
    let text = String::from_utf8_lossy(&first).to_string();
    assert!(!text.contains("CreationDate"));
    assert!(text.contains("Winner: variant A"));
}

fn metric_rows() -> Vec<MetricsExportRow> {
    vec![
        MetricsExportRow {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            views: 100,
            watch_minutes: 420,
            likes: 10,
            comments: 4,
            shares: 2,
            ctr: 10.0,
            engagement_rate: 16.0,
        },
        MetricsExportRow {
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            views: 150,
            watch_minutes: 610,
            likes: 12,
            comments: 6,
            shares: 1,
            ctr: 10.0,
            engagement_rate: 12.67,
        },
    ]
}

#[test]
fn video_metrics_csv_is_byte_reproducible_with_totals() {
    let first = video_metrics_csv("vid-123", &metric_rows()).unwrap();
    let second = video_metrics_csv("vid-123", &metric_rows()).unwrap();
    assert_eq!(first, second);

    let text = String::from_utf8(first).unwrap();
    assert!(text.contains("vid-123,2024-03-01,100,420,10,4,2,10.00,16.00"));
    assert!(text.contains("Total Views,250"));
    assert!(text.contains("Total Watch Time,1030"));
}
